//! Mpd2hls-Media: DASH-to-HLS manifest translation.
//!
//! This crate holds the pure translation logic of mpd2hls. It never touches the
//! network; callers hand it manifest bytes and key material and get back
//! playlist structures ready to render.
//!
//! # Modules
//!
//! - `dash` - Typed MPD tree (Period → AdaptationSet → Representation → SegmentTemplate)
//! - `timeline` - Segment timeline expansion into explicit (URL, duration) pairs
//! - `keys` - Key material normalisation, ClearKey key-set documents, HLS key descriptors
//! - `hls` - HLS master/media playlist model and m3u8 rendering
//! - `builder` - Master and media playlist builders over a parsed manifest
//!
//! # Flow
//!
//! ```text
//! bytes ──dash::parse──▶ Manifest ──builder::master_playlist──▶ MasterPlaylist
//!                           │
//!                           └─builder::expand_representation──▶ ExpandedTimeline ─┐
//! KeyMaterial ──keys::key_descriptor──▶ KeyDescriptor ─────────────────────────────┴─▶ MediaPlaylist
//! ```

pub mod builder;
pub mod dash;
pub mod hls;
pub mod keys;
pub mod timeline;

pub use builder::{expand_representation, master_playlist, media_playlist, TargetDurationPolicy};
pub use dash::Manifest;
pub use hls::{MasterPlaylist, MediaPlaylist};
pub use keys::{KeyDescriptor, KeyMaterial, KeySet};
pub use timeline::{ExpandedSegment, ExpandedTimeline};
