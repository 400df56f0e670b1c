//! Key packaging.
//!
//! One fetch of key material feeds two outputs:
//!
//! - a ClearKey key-set document (`{"keys":[{"kty":"oct","k":..,"kid":..}]}`)
//!   served to DRM-aware players, and
//! - an `AES-128` key descriptor embedded in media playlists as a data URI.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use mpd2hls_common::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Prefix of the data URI carrying the content key in `#EXT-X-KEY`.
pub const KEY_DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Decoded content key and key ID.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: Vec<u8>,
    kid: Vec<u8>,
}

impl KeyMaterial {
    /// Build from hexadecimal strings. Dashes in the key ID (UUID form) are
    /// stripped before decoding.
    pub fn from_hex(key_hex: &str, kid_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let kid_hex = kid_hex.trim().replace('-', "");

        if key_hex.is_empty() {
            return Err(Error::malformed_key("key_hex is missing or empty"));
        }
        if kid_hex.is_empty() {
            return Err(Error::malformed_key("kid_hex is missing or empty"));
        }

        let key = hex::decode(key_hex)
            .map_err(|e| Error::malformed_key(format!("key_hex is not valid hex: {e}")))?;
        let kid = hex::decode(&kid_hex)
            .map_err(|e| Error::malformed_key(format!("kid_hex is not valid hex: {e}")))?;

        Ok(Self { key, kid })
    }

    /// Build from the base64url fields of a ClearKey license response.
    /// Trailing `=` padding is tolerated.
    pub fn from_base64url(k: &str, kid: &str) -> Result<Self> {
        let decode = |field: &str, value: &str| -> Result<Vec<u8>> {
            let value = value.trim().trim_end_matches('=');
            if value.is_empty() {
                return Err(Error::malformed_key(format!("{field} is missing or empty")));
            }
            URL_SAFE_NO_PAD
                .decode(value)
                .map_err(|e| Error::malformed_key(format!("{field} is not valid base64url: {e}")))
        };

        Ok(Self {
            key: decode("k", k)?,
            kid: decode("kid", kid)?,
        })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn kid(&self) -> &[u8] {
        &self.kid
    }

    /// Lowercase hex of the key ID.
    pub fn kid_hex(&self) -> String {
        hex::encode(&self.kid)
    }
}

// Key bytes never reach logs.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .field("kid", &self.kid_hex())
            .finish()
    }
}

/// Base64url (unpadded) form of a hex key ID, as used in ClearKey license requests.
pub fn kid_to_base64url(kid_hex: &str) -> Result<String> {
    let kid = hex::decode(kid_hex.trim().replace('-', ""))
        .map_err(|e| Error::malformed_key(format!("default_KID is not valid hex: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(kid))
}

/// ClearKey key-set document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySet {
    pub keys: Vec<JsonWebKey>,
}

/// A single octet-sequence key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonWebKey {
    pub kty: &'static str,
    pub k: String,
    pub kid: String,
}

impl KeySet {
    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| Error::malformed_key(format!("failed to marshal key set: {e}")))
    }
}

/// Single-entry key set with standard (padded) base64 fields.
pub fn key_set(material: &KeyMaterial) -> KeySet {
    KeySet {
        keys: vec![JsonWebKey {
            kty: "oct",
            k: STANDARD.encode(&material.key),
            kid: STANDARD.encode(&material.kid),
        }],
    }
}

/// Encryption method of an HLS key descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMethod {
    Aes128,
}

impl KeyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMethod::Aes128 => "AES-128",
        }
    }
}

/// Key reference embedded in a media playlist (`#EXT-X-KEY`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub method: KeyMethod,
    pub uri: String,
}

/// AES-128 descriptor carrying the content key inline as a data URI.
///
/// Only the key is embedded; the key ID is not part of the descriptor. The
/// base64 text keeps its own computed padding and nothing is appended to it.
pub fn key_descriptor(material: &KeyMaterial) -> KeyDescriptor {
    KeyDescriptor {
        method: KeyMethod::Aes128,
        uri: format!("{KEY_DATA_URI_PREFIX}{}", STANDARD.encode(&material.key)),
    }
}
