use mpd2hls_media::TargetDurationPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub keys: KeysConfig,

    #[serde(default)]
    pub playlist: PlaylistConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8181
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// URL of the DASH manifest (MPD) every request is translated from
    #[serde(default)]
    pub manifest_url: String,

    /// Per-request timeout in seconds (default: none, transport defaults apply)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Upper bound on in-flight upstream requests across all adapters
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Extra headers sent with every upstream request (e.g. Referer, Origin)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_max_concurrent_requests() -> usize {
    16
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            manifest_url: String::new(),
            timeout_secs: None,
            max_concurrent_requests: default_max_concurrent_requests(),
            headers: BTreeMap::new(),
        }
    }
}

/// Where content keys come from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeysConfig {
    /// Key-management endpoint answering `{"key_hex": .., "kid_hex": ..}`
    Hex { url: String },

    /// ClearKey license server, queried with the manifest's default KID
    ClearKey { license_url: String },
}

impl KeysConfig {
    /// The endpoint the key adapter talks to.
    pub fn url(&self) -> &str {
        match self {
            KeysConfig::Hex { url } => url,
            KeysConfig::ClearKey { license_url } => license_url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            KeysConfig::Hex { .. } => "hex",
            KeysConfig::ClearKey { .. } => "clearkey",
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig::Hex { url: String::new() }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaylistConfig {
    /// How `#EXT-X-TARGETDURATION` is chosen ("first_entry" or "longest")
    #[serde(default)]
    pub target_duration: TargetDurationPolicy,
}
