//! DASH manifest (MPD) model.
//!
//! A plain tree of owned values, deserialized with `quick-xml`'s serde support.
//! Only the parts of the MPD schema that the translation needs are modelled;
//! every other element and attribute is ignored.

use mpd2hls_common::{Error, Result};
use serde::Deserialize;

/// Scheme of the common-encryption `ContentProtection` descriptor that carries
/// the default key ID.
pub const MP4_PROTECTION_SCHEME: &str = "urn:mpeg:dash:mp4protection:2011";

/// Mime type that marks an adaptation set as audio-only.
pub const AUDIO_MIME_TYPE: &str = "audio/mp4";

/// Root of a parsed MPD document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// `static` or `dynamic`.
    #[serde(rename = "@type")]
    pub presentation_type: Option<String>,

    #[serde(rename = "Period", default)]
    pub periods: Vec<Period>,
}

/// A timeline segment of the presentation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Period {
    #[serde(rename = "@id")]
    pub id: Option<String>,

    #[serde(rename = "BaseURL", default)]
    pub base_urls: Vec<BaseUrl>,

    #[serde(rename = "AdaptationSet", default)]
    pub adaptation_sets: Vec<AdaptationSet>,
}

/// Text content of a `BaseURL` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaseUrl {
    #[serde(rename = "$text", default)]
    pub value: String,
}

/// A group of interchangeable renditions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdaptationSet {
    #[serde(rename = "@mimeType")]
    pub mime_type: Option<String>,

    #[serde(rename = "@codecs")]
    pub codecs: Option<String>,

    #[serde(rename = "SegmentTemplate")]
    pub segment_template: Option<SegmentTemplate>,

    #[serde(rename = "ContentProtection", default)]
    pub content_protection: Vec<ContentProtection>,

    #[serde(rename = "Representation", default)]
    pub representations: Vec<Representation>,
}

/// One concrete rendition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Representation {
    #[serde(rename = "@id")]
    pub id: Option<String>,

    /// Bits per second.
    #[serde(rename = "@bandwidth")]
    pub bandwidth: Option<u64>,

    #[serde(rename = "@width")]
    pub width: Option<u64>,

    #[serde(rename = "@height")]
    pub height: Option<u64>,

    #[serde(rename = "@codecs")]
    pub codecs: Option<String>,

    #[serde(rename = "SegmentTemplate")]
    pub segment_template: Option<SegmentTemplate>,

    #[serde(rename = "ContentProtection", default)]
    pub content_protection: Vec<ContentProtection>,
}

/// Template-based segment addressing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentTemplate {
    /// Media URL pattern, e.g. `$RepresentationID$/seg-$Number$.m4s`.
    #[serde(rename = "@media")]
    pub media: Option<String>,

    #[serde(rename = "@initialization")]
    pub initialization: Option<String>,

    #[serde(rename = "@timescale")]
    pub timescale: Option<u64>,

    #[serde(rename = "@startNumber")]
    pub start_number: Option<u64>,

    #[serde(rename = "SegmentTimeline")]
    pub segment_timeline: Option<SegmentTimeline>,
}

/// Run-length encoded list of segment durations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentTimeline {
    #[serde(rename = "S", default)]
    pub entries: Vec<TimelineEntry>,
}

/// One `S` element: `r + 1` contiguous segments of duration `d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimelineEntry {
    /// Presentation time of the first segment, in timescale units.
    #[serde(rename = "@t")]
    pub t: Option<u64>,

    /// Duration in timescale units.
    #[serde(rename = "@d")]
    pub d: u64,

    /// Repeat count; negative means "until the end of the period".
    #[serde(rename = "@r")]
    pub r: Option<i64>,
}

/// DRM signalling attached to an adaptation set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentProtection {
    #[serde(rename = "@schemeIdUri")]
    pub scheme_id_uri: Option<String>,

    /// `cenc:default_KID`; attributes are matched by local name.
    #[serde(rename = "@default_KID")]
    pub default_kid: Option<String>,
}

/// Parse raw MPD bytes into a [`Manifest`].
pub fn parse(bytes: &[u8]) -> Result<Manifest> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| Error::malformed_manifest(format!("manifest is not valid UTF-8: {e}")))?;
    let xml = xml.trim_start_matches('\u{feff}');

    quick_xml::de::from_str(xml).map_err(|e| Error::malformed_manifest(e.to_string()))
}

impl Manifest {
    /// Iterate every representation in document order together with its
    /// owning period and adaptation set.
    pub fn representations(
        &self,
    ) -> impl Iterator<Item = (&Period, &AdaptationSet, &Representation)> {
        self.periods.iter().flat_map(|period| {
            period.adaptation_sets.iter().flat_map(move |set| {
                set.representations
                    .iter()
                    .map(move |rep| (period, set, rep))
            })
        })
    }

    /// Default key ID from the first common-encryption descriptor, if any.
    ///
    /// Each adaptation set's own descriptors are checked before those of its
    /// representations, in document order.
    pub fn default_kid(&self) -> Option<&str> {
        self.periods
            .iter()
            .flat_map(|p| p.adaptation_sets.iter())
            .flat_map(|a| {
                a.content_protection.iter().chain(
                    a.representations
                        .iter()
                        .flat_map(|r| r.content_protection.iter()),
                )
            })
            .filter(|cp| cp.scheme_id_uri.as_deref() == Some(MP4_PROTECTION_SCHEME))
            .find_map(|cp| cp.default_kid.as_deref())
    }
}

impl Period {
    /// The period's first BaseURL with any query string removed, or `""`.
    pub fn base_url(&self) -> &str {
        self.base_urls
            .first()
            .map(|b| b.value.trim())
            .and_then(|b| b.split('?').next())
            .unwrap_or("")
    }
}

impl AdaptationSet {
    pub fn is_audio(&self) -> bool {
        self.mime_type.as_deref() == Some(AUDIO_MIME_TYPE)
    }
}

impl Representation {
    /// The representation's ID when present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Own template if present, else the adaptation set's.
    pub fn effective_template<'a>(&'a self, set: &'a AdaptationSet) -> Option<&'a SegmentTemplate> {
        self.segment_template
            .as_ref()
            .or(set.segment_template.as_ref())
    }

    /// Own codecs if present, else the adaptation set's, else `""`.
    pub fn effective_codecs<'a>(&'a self, set: &'a AdaptationSet) -> &'a str {
        self.codecs
            .as_deref()
            .or(set.codecs.as_deref())
            .unwrap_or("")
    }
}

impl SegmentTemplate {
    /// Timescale in units per second; DASH defaults to 1.
    pub fn timescale(&self) -> u64 {
        self.timescale.unwrap_or(1)
    }

    /// Number of the first segment; DASH defaults to 1.
    pub fn start_number(&self) -> u64 {
        self.start_number.unwrap_or(1)
    }
}
