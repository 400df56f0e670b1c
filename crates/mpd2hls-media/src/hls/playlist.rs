//! HLS playlist structures.

use crate::keys::KeyDescriptor;
use std::fmt::{self, Write};

/// Media playlist for a single rendition.
///
/// Always rendered as a complete VOD playlist terminated by `#EXT-X-ENDLIST`.
#[derive(Debug, Clone)]
pub struct MediaPlaylist {
    /// Target duration in whole seconds.
    pub target_duration: u64,
    /// Media sequence number.
    pub media_sequence: u64,
    /// Decryption key for every segment.
    pub key: Option<KeyDescriptor>,
    /// Init segment URI.
    pub init_uri: Option<String>,
    /// Segment entries.
    pub segments: Vec<SegmentEntry>,
}

impl MediaPlaylist {
    /// Create a new VOD playlist.
    pub fn vod() -> Self {
        Self {
            target_duration: 0,
            media_sequence: 0,
            key: None,
            init_uri: None,
            segments: Vec::new(),
        }
    }

    /// Set the target duration from a duration in seconds, rounded up.
    pub fn set_target_duration(&mut self, seconds: f64) {
        self.target_duration = seconds.ceil().max(0.0) as u64;
    }

    /// Append a segment.
    pub fn push(&mut self, uri: impl Into<String>, duration: f64) {
        self.segments.push(SegmentEntry {
            duration,
            uri: uri.into(),
        });
    }

    /// Render to M3U8 string.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "#EXTM3U").unwrap();
        writeln!(out, "#EXT-X-VERSION:7").unwrap();
        writeln!(out, "#EXT-X-TARGETDURATION:{}", self.target_duration).unwrap();
        writeln!(out, "#EXT-X-MEDIA-SEQUENCE:{}", self.media_sequence).unwrap();
        writeln!(out, "#EXT-X-PLAYLIST-TYPE:VOD").unwrap();

        if let Some(ref key) = self.key {
            writeln!(
                out,
                "#EXT-X-KEY:METHOD={},URI=\"{}\"",
                key.method.as_str(),
                key.uri
            )
            .unwrap();
        }

        if let Some(ref init_uri) = self.init_uri {
            writeln!(out, "#EXT-X-MAP:URI=\"{}\"", init_uri).unwrap();
        }

        for segment in &self.segments {
            writeln!(out, "#EXTINF:{:.6},", segment.duration).unwrap();
            writeln!(out, "{}", segment.uri).unwrap();
        }

        writeln!(out, "#EXT-X-ENDLIST").unwrap();

        out
    }
}

/// A segment entry in the playlist.
#[derive(Debug, Clone)]
pub struct SegmentEntry {
    /// Duration in seconds.
    pub duration: f64,
    /// Segment URI.
    pub uri: String,
}

/// Master playlist with multiple renditions.
#[derive(Debug, Clone, Default)]
pub struct MasterPlaylist {
    /// Stream variants.
    pub streams: Vec<StreamInfo>,
}

impl MasterPlaylist {
    /// Render to M3U8 string.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "#EXTM3U").unwrap();
        writeln!(out, "#EXT-X-VERSION:6").unwrap();

        for stream in &self.streams {
            write!(out, "#EXT-X-STREAM-INF:BANDWIDTH={}", stream.bandwidth).unwrap();

            if let Some(ref resolution) = stream.resolution {
                write!(out, ",RESOLUTION={}", resolution).unwrap();
            }

            if !stream.codecs.is_empty() {
                write!(out, ",CODECS=\"{}\"", stream.codecs).unwrap();
            }

            writeln!(out).unwrap();
            writeln!(out, "{}", stream.uri).unwrap();
        }

        out
    }
}

/// Stream variant information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Playlist URI.
    pub uri: String,
    /// Bandwidth in bits per second.
    pub bandwidth: u64,
    /// Codec string (e.g., "avc1.64001f,mp4a.40.2"); empty when unknown.
    pub codecs: String,
    /// Video resolution, absent for audio renditions.
    pub resolution: Option<Resolution>,
}

/// Frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u64,
    pub height: u64,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
