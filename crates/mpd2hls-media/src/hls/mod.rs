//! HLS playlist generation.
//!
//! This module models and renders M3U8 master and media playlists.

mod playlist;

pub use playlist::{MasterPlaylist, MediaPlaylist, Resolution, SegmentEntry, StreamInfo};
