//! Shared test harness for integration tests.
//!
//! Provides in-memory [`ManifestSource`] / [`KeySource`] doubles, a fixture
//! MPD, and helpers for driving the router with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mpd2hls::config::Config;
use mpd2hls::server::{create_router, AppContext};
use mpd2hls::upstream::{KeySource, ManifestSource};
use mpd2hls_common::{Error, Result};
use mpd2hls_media::{dash, KeyMaterial, Manifest};

pub const KEY_HEX: &str = "00112233445566778899aabbccddeeff";
pub const KID_HEX: &str = "0123456789abcdef0123456789abcdef";

/// Two periods, video with an inherited template, audio with its own, and a
/// subtitle set without any template.
pub const FIXTURE_MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" xmlns:cenc="urn:mpeg:cenc:2013" type="static">
  <Period id="p0">
    <BaseURL>https://cdn.example.com/vod/?token=abc</BaseURL>
    <AdaptationSet mimeType="video/mp4" codecs="avc1.64001f">
      <ContentProtection schemeIdUri="urn:mpeg:dash:mp4protection:2011" value="cenc" cenc:default_KID="01234567-89ab-cdef-0123-456789abcdef"/>
      <SegmentTemplate media="$RepresentationID$/seg-$Number$.m4s" initialization="$RepresentationID$/init.mp4" timescale="1000" startNumber="1">
        <SegmentTimeline>
          <S t="0" d="2000" r="2"/>
          <S d="4000"/>
        </SegmentTimeline>
      </SegmentTemplate>
      <Representation id="v1" bandwidth="500000" width="1920" height="1080" codecs="avc1"/>
      <Representation id="v2" bandwidth="250000" width="1280" height="720"/>
    </AdaptationSet>
    <AdaptationSet mimeType="audio/mp4" codecs="mp4a.40.2">
      <Representation id="a1" bandwidth="128000">
        <SegmentTemplate media="audio/$Number$.m4s" initialization="audio/init.mp4" timescale="48000" startNumber="10">
          <SegmentTimeline>
            <S d="96000" r="1"/>
          </SegmentTimeline>
        </SegmentTemplate>
      </Representation>
    </AdaptationSet>
    <AdaptationSet mimeType="text/vtt">
      <Representation id="t1" bandwidth="1000"/>
    </AdaptationSet>
  </Period>
</MPD>"#;

/// Manifest double that parses fixed XML on every fetch.
pub struct StaticManifest {
    xml: &'static str,
    pub fetches: AtomicUsize,
}

impl StaticManifest {
    pub fn new(xml: &'static str) -> Arc<Self> {
        Arc::new(Self {
            xml,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ManifestSource for StaticManifest {
    async fn fetch(&self) -> Result<Manifest> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        dash::parse(self.xml.as_bytes())
    }
}

/// Manifest double whose origin is down.
pub struct UnavailableManifest;

#[async_trait::async_trait]
impl ManifestSource for UnavailableManifest {
    async fn fetch(&self) -> Result<Manifest> {
        Err(Error::manifest_unavailable("connection refused"))
    }
}

/// Key double answering with fixed hex fields.
pub struct StaticKeys {
    key_hex: &'static str,
    kid_hex: &'static str,
    pub fetches: AtomicUsize,
}

impl StaticKeys {
    pub fn new(key_hex: &'static str, kid_hex: &'static str) -> Arc<Self> {
        Arc::new(Self {
            key_hex,
            kid_hex,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl KeySource for StaticKeys {
    async fn fetch(&self) -> Result<KeyMaterial> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        KeyMaterial::from_hex(self.key_hex, self.kid_hex)
    }
}

/// Key double whose endpoint is down.
pub struct UnavailableKeys;

#[async_trait::async_trait]
impl KeySource for UnavailableKeys {
    async fn fetch(&self) -> Result<KeyMaterial> {
        Err(Error::keys_unavailable("connection refused"))
    }
}

/// Build a context around the given doubles with default configuration.
pub fn context(manifests: Arc<dyn ManifestSource>, keys: Arc<dyn KeySource>) -> AppContext {
    context_with_config(Config::default(), manifests, keys)
}

pub fn context_with_config(
    config: Config,
    manifests: Arc<dyn ManifestSource>,
    keys: Arc<dyn KeySource>,
) -> AppContext {
    AppContext {
        config: Arc::new(config),
        manifests,
        keys,
    }
}

/// Context over the fixture manifest and fixed test keys.
pub fn fixture_context() -> AppContext {
    context(
        StaticManifest::new(FIXTURE_MPD),
        StaticKeys::new(KEY_HEX, KID_HEX),
    )
}

/// Send a GET through the router.
pub async fn get(ctx: AppContext, uri: &str) -> Response<Body> {
    create_router(ctx)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Helper to get response body as string
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn content_type(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
