use super::{KeySource, ManifestSource, UpstreamClient};
use mpd2hls_common::{Error, Result, Upstream};
use mpd2hls_media::keys::kid_to_base64url;
use mpd2hls_media::KeyMaterial;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response of the key-management endpoint.
#[derive(Debug, Deserialize)]
struct HexKeyResponse {
    #[serde(default)]
    key_hex: Option<String>,
    #[serde(default)]
    kid_hex: Option<String>,
}

/// Key-management endpoint returning the key and key ID as hex strings.
pub struct HexKeySource {
    client: UpstreamClient,
    url: String,
}

impl HexKeySource {
    pub fn new(client: UpstreamClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl KeySource for HexKeySource {
    async fn fetch(&self) -> Result<KeyMaterial> {
        let body = self
            .client
            .send(self.client.get(&self.url), Upstream::Keys)
            .await?;

        let response: HexKeyResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::malformed_key(format!("key response is not valid JSON: {e}")))?;

        KeyMaterial::from_hex(
            response.key_hex.as_deref().unwrap_or_default(),
            response.kid_hex.as_deref().unwrap_or_default(),
        )
    }
}

/// W3C ClearKey license request.
#[derive(Debug, Serialize)]
struct LicenseRequest<'a> {
    kids: Vec<String>,
    #[serde(rename = "type")]
    session_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct LicenseResponse {
    #[serde(default)]
    keys: Vec<LicenseKey>,
}

#[derive(Debug, Deserialize)]
struct LicenseKey {
    #[serde(default)]
    k: String,
    #[serde(default)]
    kid: String,
}

/// ClearKey license server, asked for the key of the manifest's default KID.
///
/// A manifest without a usable `default_KID` is a key failure, not a
/// manifest failure: the playlist routes never need the KID.
pub struct ClearKeySource {
    client: UpstreamClient,
    license_url: String,
    manifests: Arc<dyn ManifestSource>,
}

impl ClearKeySource {
    pub fn new(
        client: UpstreamClient,
        license_url: impl Into<String>,
        manifests: Arc<dyn ManifestSource>,
    ) -> Self {
        Self {
            client,
            license_url: license_url.into(),
            manifests,
        }
    }
}

#[async_trait::async_trait]
impl KeySource for ClearKeySource {
    async fn fetch(&self) -> Result<KeyMaterial> {
        let manifest = self.manifests.fetch().await?;
        let default_kid = manifest
            .default_kid()
            .ok_or_else(|| Error::malformed_key("manifest declares no default_KID"))?;

        let request = LicenseRequest {
            kids: vec![kid_to_base64url(default_kid)?],
            session_type: "temporary",
        };
        tracing::debug!(kid = %default_kid, "Requesting ClearKey license");

        let body = self
            .client
            .send(
                self.client.post(&self.license_url).json(&request),
                Upstream::Keys,
            )
            .await?;

        let response: LicenseResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::malformed_key(format!("license response is not valid JSON: {e}"))
        })?;

        let key = response
            .keys
            .first()
            .ok_or_else(|| Error::malformed_key("license response contains no keys"))?;

        KeyMaterial::from_base64url(&key.k, &key.kid)
    }
}
