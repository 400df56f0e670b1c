//! Upstream adapters.
//!
//! Every inbound request re-fetches the manifest and the key material through
//! these traits. Nothing is cached between requests and nothing is retried;
//! the only shared state is a semaphore bounding how many upstream requests
//! are in flight at once.

pub mod keys;
pub mod manifest;

pub use keys::{ClearKeySource, HexKeySource};
pub use manifest::HttpManifestSource;

use crate::config::{Config, KeysConfig, UpstreamConfig};
use anyhow::Context;
use mpd2hls_common::{Error, Result, Upstream};
use mpd2hls_media::{KeyMaterial, Manifest};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Source of the DASH manifest.
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch and parse the manifest. One upstream request per call.
    async fn fetch(&self) -> Result<Manifest>;
}

/// Source of the content key.
#[async_trait::async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch and normalise key material. One logical fetch per call.
    async fn fetch(&self) -> Result<KeyMaterial>;
}

/// HTTP client shared by the adapters, with a bound on concurrent requests.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    limiter: Arc<Semaphore>,
}

impl UpstreamClient {
    /// Build a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid upstream header name: {:?}", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for upstream header {:?}", name))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            limiter: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
        })
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request and read the whole body. Transport failures, non-2xx
    /// statuses and unreadable bodies are all reported as unavailable.
    pub(crate) async fn send(&self, request: RequestBuilder, upstream: Upstream) -> Result<Vec<u8>> {
        let unavailable = |message: String| Error::UpstreamUnavailable { upstream, message };

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| unavailable(format!("request limiter closed: {e}")))?;

        let response = request
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            return Err(unavailable(format!("{url} returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| unavailable(format!("failed to read body from {url}: {e}")))?;

        tracing::debug!(%upstream, %url, bytes = body.len(), "Fetched upstream response");
        Ok(body.to_vec())
    }
}

/// Create the manifest adapter for the configured origin.
pub fn create_manifest_source(config: &Config, client: UpstreamClient) -> Arc<dyn ManifestSource> {
    Arc::new(HttpManifestSource::new(client, &config.upstream.manifest_url))
}

/// Create the key adapter selected by `[keys] type`.
pub fn create_key_source(
    config: &Config,
    client: UpstreamClient,
    manifests: Arc<dyn ManifestSource>,
) -> Arc<dyn KeySource> {
    match &config.keys {
        KeysConfig::Hex { url } => Arc::new(HexKeySource::new(client, url)),
        KeysConfig::ClearKey { license_url } => {
            Arc::new(ClearKeySource::new(client, license_url, manifests))
        }
    }
}
