use super::{ManifestSource, UpstreamClient};
use mpd2hls_common::{Result, Upstream};
use mpd2hls_media::{dash, Manifest};

/// Fetches the MPD over HTTP on every call.
pub struct HttpManifestSource {
    client: UpstreamClient,
    url: String,
}

impl HttpManifestSource {
    pub fn new(client: UpstreamClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<Manifest> {
        let body = self
            .client
            .send(self.client.get(&self.url), Upstream::Manifest)
            .await?;

        let manifest = dash::parse(&body)?;
        tracing::debug!(
            periods = manifest.periods.len(),
            representations = manifest.representations().count(),
            "Parsed manifest"
        );

        Ok(manifest)
    }
}
