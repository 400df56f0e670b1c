//! Segment timeline expansion.
//!
//! Turns a `SegmentTemplate` with a run-length encoded `SegmentTimeline` into
//! the explicit, ordered list of segment URLs and durations that an HLS media
//! playlist needs.
//!
//! Each `S` entry `(d, r)` yields `r + 1` segments of `d / timescale` seconds.
//! Segment numbers start at the template's `startNumber` and increase by one
//! per emitted segment, repeats included, without resetting between entries.
//!
//! Relative URLs are joined to the period BaseURL by plain concatenation;
//! `..` path segments are not collapsed.

use crate::dash::SegmentTemplate;
use mpd2hls_common::{Error, Result};

/// Upper bound on segments produced for one representation.
pub const MAX_EXPANDED_SEGMENTS: usize = 1 << 20;

/// Widest `%0<width>d` format tag honoured; a `u64` never needs more digits.
pub const MAX_NUMBER_WIDTH: usize = 20;

/// One concrete media segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedSegment {
    /// Value substituted for `$Number$`.
    pub number: u64,
    /// Segment URL, already joined to the BaseURL.
    pub uri: String,
    /// Duration in seconds.
    pub duration: f64,
}

/// Fully expanded addressing for one representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedTimeline {
    /// Initialization segment URL, if the template declares one.
    pub init_uri: Option<String>,
    /// Segments in presentation order.
    pub segments: Vec<ExpandedSegment>,
    /// Duration of the first timeline entry, in seconds.
    pub first_entry_duration: Option<f64>,
}

impl ExpandedTimeline {
    /// Longest segment duration in seconds.
    pub fn longest_duration(&self) -> Option<f64> {
        self.segments
            .iter()
            .map(|s| s.duration)
            .reduce(f64::max)
    }

    /// Sum of all segment durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

/// Values available to `$Identifier$` substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateVars<'a> {
    pub representation_id: &'a str,
    pub bandwidth: Option<u64>,
    pub number: Option<u64>,
    pub time: Option<u64>,
}

impl TemplateVars<'_> {
    fn resolve(&self, tag: &str) -> Option<String> {
        let (name, format) = match tag.split_once('%') {
            Some((name, format)) => (name, Some(format)),
            None => (tag, None),
        };

        // Width tags are not allowed on RepresentationID.
        if name == "RepresentationID" {
            return format
                .is_none()
                .then(|| self.representation_id.to_string());
        }

        let value = match name {
            "Number" => self.number?,
            "Bandwidth" => self.bandwidth?,
            "Time" => self.time?,
            _ => return None,
        };

        match format {
            None => Some(value.to_string()),
            Some(format) => {
                let width: usize = format.strip_prefix('0')?.strip_suffix('d')?.parse().ok()?;
                if width > MAX_NUMBER_WIDTH {
                    return None;
                }
                Some(format!("{value:0width$}"))
            }
        }
    }
}

/// Substitute `$Identifier$` tags in a DASH URL template.
///
/// `$$` is an escaped dollar sign. Identifiers that are unknown, or whose value
/// is not available in `vars`, are left in the output verbatim.
pub fn substitute(pattern: &str, vars: &TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('$') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let tag = &after[..end];
        if tag.is_empty() {
            out.push('$');
        } else if let Some(value) = vars.resolve(tag) {
            out.push_str(&value);
        } else {
            out.push('$');
            out.push_str(tag);
            out.push('$');
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand a template for one representation.
///
/// `base_url` is prepended verbatim to every produced URL.
pub fn expand(
    template: &SegmentTemplate,
    representation_id: &str,
    bandwidth: Option<u64>,
    base_url: &str,
) -> Result<ExpandedTimeline> {
    let media = template
        .media
        .as_deref()
        .ok_or_else(|| Error::missing_template(representation_id))?;

    let timeline = template.segment_timeline.as_ref().ok_or_else(|| {
        Error::malformed_manifest(format!(
            "segment template for representation {representation_id} has no SegmentTimeline"
        ))
    })?;

    let timescale = template.timescale();
    if timescale == 0 {
        return Err(Error::malformed_manifest(format!(
            "segment template for representation {representation_id} has timescale 0"
        )));
    }

    let mut vars = TemplateVars {
        representation_id,
        bandwidth,
        number: None,
        time: None,
    };

    let init_uri = template
        .initialization
        .as_deref()
        .map(|pattern| format!("{base_url}{}", substitute(pattern, &vars)));

    let mut segments = Vec::new();
    // `None` once the counter has run past `u64::MAX`.
    let mut number = Some(template.start_number());
    let mut time = 0u64;

    for entry in &timeline.entries {
        if let Some(t) = entry.t {
            time = t;
        }

        let duration = entry.d as f64 / timescale as f64;
        let repeats = entry.r.filter(|r| *r > 0).unwrap_or(0) as u64;

        if segments.len() as u64 + repeats + 1 > MAX_EXPANDED_SEGMENTS as u64 {
            return Err(Error::malformed_manifest(format!(
                "segment timeline for representation {representation_id} expands beyond {MAX_EXPANDED_SEGMENTS} segments"
            )));
        }

        for _ in 0..=repeats {
            let number_value = number.ok_or_else(|| {
                Error::malformed_manifest(format!(
                    "segment numbers for representation {representation_id} overflow"
                ))
            })?;
            vars.number = Some(number_value);
            vars.time = Some(time);

            segments.push(ExpandedSegment {
                number: number_value,
                uri: format!("{base_url}{}", substitute(media, &vars)),
                duration,
            });

            number = number_value.checked_add(1);
            time = time.saturating_add(entry.d);
        }
    }

    let first_entry_duration = timeline
        .entries
        .first()
        .map(|e| e.d as f64 / timescale as f64);

    Ok(ExpandedTimeline {
        init_uri,
        segments,
        first_entry_duration,
    })
}
