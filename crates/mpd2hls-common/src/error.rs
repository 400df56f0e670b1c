//! Common error types used throughout mpd2hls.
//!
//! Every failure is detected where it happens and surfaced as one of these
//! variants; nothing in the system retries or falls back to partial output.

use std::fmt;

/// Which upstream collaborator a request was talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// The DASH manifest origin.
    Manifest,
    /// The key-management (or ClearKey license) endpoint.
    Keys,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Manifest => f.write_str("manifest"),
            Upstream::Keys => f.write_str("key"),
        }
    }
}

/// Common error type for mpd2hls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure, non-success status or unreadable body from an upstream.
    #[error("Upstream {upstream} service unavailable: {message}")]
    UpstreamUnavailable { upstream: Upstream, message: String },

    /// The manifest bytes could not be parsed into a usable tree.
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// Key material was missing, empty, not hex/base64, or could not be marshalled.
    #[error("Malformed key response: {0}")]
    MalformedKeyResponse(String),

    /// No representation with the requested ID exists in the manifest.
    #[error("Representation ID not found: {0}")]
    RepresentationNotFound(String),

    /// The representation has no segment addressing rule.
    #[error("No segment template found for representation: {0}")]
    MissingSegmentTemplate(String),

    /// The inbound request itself was unusable.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Create an UpstreamUnavailable error for the manifest origin.
    pub fn manifest_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamUnavailable {
            upstream: Upstream::Manifest,
            message: msg.into(),
        }
    }

    /// Create an UpstreamUnavailable error for the key service.
    pub fn keys_unavailable<S: Into<String>>(msg: S) -> Self {
        Self::UpstreamUnavailable {
            upstream: Upstream::Keys,
            message: msg.into(),
        }
    }

    /// Create a new MalformedManifest error.
    pub fn malformed_manifest<S: Into<String>>(msg: S) -> Self {
        Self::MalformedManifest(msg.into())
    }

    /// Create a new MalformedKeyResponse error.
    pub fn malformed_key<S: Into<String>>(msg: S) -> Self {
        Self::MalformedKeyResponse(msg.into())
    }

    /// Create a new RepresentationNotFound error.
    pub fn representation_not_found<S: Into<String>>(id: S) -> Self {
        Self::RepresentationNotFound(id.into())
    }

    /// Create a new MissingSegmentTemplate error.
    pub fn missing_template<S: Into<String>>(id: S) -> Self {
        Self::MissingSegmentTemplate(id.into())
    }

    /// Create a new InvalidRequest error.
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status code the router answers with for this error.
    ///
    /// A manifest that cannot be fetched or parsed is a gateway problem (502);
    /// key retrieval problems abort the request as an internal error (500).
    pub fn http_status(&self) -> u16 {
        match self {
            Error::UpstreamUnavailable {
                upstream: Upstream::Manifest,
                ..
            } => 502,
            Error::UpstreamUnavailable {
                upstream: Upstream::Keys,
                ..
            } => 500,
            Error::MalformedManifest(_) => 502,
            Error::MalformedKeyResponse(_) => 500,
            Error::RepresentationNotFound(_) => 404,
            Error::MissingSegmentTemplate(_) => 500,
            Error::InvalidRequest(_) => 400,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::representation_not_found("v1");
        assert_eq!(err.to_string(), "Representation ID not found: v1");

        let err = Error::manifest_unavailable("connection refused");
        assert_eq!(
            err.to_string(),
            "Upstream manifest service unavailable: connection refused"
        );

        let err = Error::keys_unavailable("timed out");
        assert_eq!(err.to_string(), "Upstream key service unavailable: timed out");

        let err = Error::missing_template("a1");
        assert_eq!(
            err.to_string(),
            "No segment template found for representation: a1"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(Error::manifest_unavailable("x").http_status(), 502);
        assert_eq!(Error::malformed_manifest("x").http_status(), 502);
        assert_eq!(Error::keys_unavailable("x").http_status(), 500);
        assert_eq!(Error::malformed_key("x").http_status(), 500);
        assert_eq!(Error::representation_not_found("x").http_status(), 404);
        assert_eq!(Error::missing_template("x").http_status(), 500);
        assert_eq!(Error::invalid_request("x").http_status(), 400);
    }

    #[test]
    fn test_error_constructors() {
        let err = Error::manifest_unavailable("down");
        assert!(matches!(
            err,
            Error::UpstreamUnavailable {
                upstream: Upstream::Manifest,
                ..
            }
        ));

        let err = Error::malformed_key("empty key_hex");
        assert!(matches!(err, Error::MalformedKeyResponse(_)));
    }
}
