//! Mpd2hls-Common: error taxonomy shared by every mpd2hls crate.
//!
//! Translation code in `mpd2hls-media` and the HTTP adapters in the root
//! package report failures through the same [`Error`] so that the router can
//! map any of them onto a status code without inspecting strings.
//!
//! # Examples
//!
//! ```
//! use mpd2hls_common::{Error, Result};
//!
//! fn lookup(id: &str) -> Result<()> {
//!     Err(Error::representation_not_found(id))
//! }
//!
//! assert_eq!(lookup("v1").unwrap_err().http_status(), 404);
//! ```

pub mod error;

pub use error::{Error, Result, Upstream};
