//! Master and media playlist builders.
//!
//! The master playlist lists one variant per identified representation in
//! document order. Representation IDs repeated across periods are not merged:
//! each occurrence becomes its own variant, while a media playlist request
//! resolves to the first occurrence.

use crate::dash::{AdaptationSet, Manifest, Period, Representation};
use crate::hls::{MasterPlaylist, MediaPlaylist, Resolution, StreamInfo};
use crate::keys::KeyDescriptor;
use crate::timeline::{self, ExpandedTimeline};
use mpd2hls_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// URI of the media playlist for a representation ID.
pub fn media_playlist_uri(representation_id: &str) -> String {
    format!("/media_playlist_{representation_id}.m3u8")
}

/// How `#EXT-X-TARGETDURATION` is derived from the expanded timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetDurationPolicy {
    /// Duration of the first timeline entry. Can be shorter than later
    /// segments, which HLS does not allow.
    #[default]
    FirstEntry,
    /// Longest segment in the playlist.
    Longest,
}

/// Build the master playlist for a manifest.
pub fn master_playlist(manifest: &Manifest) -> MasterPlaylist {
    let streams = manifest
        .representations()
        .filter_map(|(_, set, rep)| {
            let id = rep.id()?;
            Some(StreamInfo {
                uri: media_playlist_uri(id),
                bandwidth: rep.bandwidth.unwrap_or(0),
                codecs: rep.effective_codecs(set).to_string(),
                resolution: resolution(set, rep),
            })
        })
        .collect();

    MasterPlaylist { streams }
}

fn resolution(set: &AdaptationSet, rep: &Representation) -> Option<Resolution> {
    if set.is_audio() {
        return None;
    }
    Some(Resolution {
        width: rep.width?,
        height: rep.height?,
    })
}

/// A representation together with the period and adaptation set that own it.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub period: &'a Period,
    pub adaptation_set: &'a AdaptationSet,
    pub representation: &'a Representation,
}

/// Find the first representation with the given ID, in document order.
pub fn locate<'a>(manifest: &'a Manifest, representation_id: &str) -> Result<Located<'a>> {
    manifest
        .representations()
        .find(|(_, _, rep)| rep.id() == Some(representation_id))
        .map(|(period, adaptation_set, representation)| Located {
            period,
            adaptation_set,
            representation,
        })
        .ok_or_else(|| Error::representation_not_found(representation_id))
}

/// Locate a representation and expand its segment timeline.
pub fn expand_representation(manifest: &Manifest, representation_id: &str) -> Result<ExpandedTimeline> {
    let located = locate(manifest, representation_id)?;

    let template = located
        .representation
        .effective_template(located.adaptation_set)
        .ok_or_else(|| Error::missing_template(representation_id))?;

    timeline::expand(
        template,
        representation_id,
        located.representation.bandwidth,
        located.period.base_url(),
    )
}

/// Assemble a closed (VOD) media playlist: key, init map, segments, end marker.
pub fn media_playlist(
    timeline: ExpandedTimeline,
    key: KeyDescriptor,
    policy: TargetDurationPolicy,
) -> MediaPlaylist {
    let mut playlist = MediaPlaylist::vod();

    let target = match policy {
        TargetDurationPolicy::FirstEntry => timeline.first_entry_duration,
        TargetDurationPolicy::Longest => timeline.longest_duration(),
    };
    if let Some(target) = target {
        playlist.set_target_duration(target);
    }

    playlist.key = Some(key);
    playlist.init_uri = timeline.init_uri;

    for segment in timeline.segments {
        playlist.push(segment.uri, segment.duration);
    }

    playlist
}
