//! mpd2hls - serve an encrypted DASH presentation to HLS-only clients
//!
//! This library crate exposes the configuration, upstream adapters and HTTP
//! router for integration testing. Translation logic lives in `mpd2hls-media`.

pub mod config;
pub mod server;
pub mod upstream;
