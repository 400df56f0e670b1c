//! HLS playlist handlers.
//!
//! Both playlists are rebuilt from a freshly fetched manifest on every
//! request; a media playlist additionally fetches the content key.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use mpd2hls_common::Error;
use mpd2hls_media::{builder, keys};

use super::{error::AppError, AppContext};

const M3U8_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

const MEDIA_PLAYLIST_PREFIX: &str = "media_playlist_";
const MEDIA_PLAYLIST_SUFFIX: &str = ".m3u8";

/// `GET /playlist.m3u8`
pub async fn master_playlist(State(ctx): State<AppContext>) -> Result<Response, AppError> {
    let manifest = ctx.manifests.fetch().await?;
    let playlist = builder::master_playlist(&manifest);

    tracing::debug!(variants = playlist.streams.len(), "Built master playlist");

    Ok(m3u8(playlist.render()))
}

/// `GET /media_playlist_<ID>.m3u8`
///
/// Registered on `/:file`, so any other single-segment path lands here too
/// and is answered with 404.
pub async fn media_playlist(
    State(ctx): State<AppContext>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = representation_id(&file) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    if id.is_empty() {
        return Err(Error::invalid_request("representation ID is empty").into());
    }

    let manifest = ctx.manifests.fetch().await?;
    let timeline = builder::expand_representation(&manifest, id)?;

    // Key failures abort the request even though the segment list is ready.
    let material = ctx.keys.fetch().await?;

    let playlist = builder::media_playlist(
        timeline,
        keys::key_descriptor(&material),
        ctx.config.playlist.target_duration,
    );

    tracing::debug!(
        representation = %id,
        segments = playlist.segments.len(),
        target_duration = playlist.target_duration,
        "Built media playlist"
    );

    Ok(m3u8(playlist.render()))
}

/// Extract `<ID>` from `media_playlist_<ID>.m3u8`.
fn representation_id(file: &str) -> Option<&str> {
    file.strip_prefix(MEDIA_PLAYLIST_PREFIX)?
        .strip_suffix(MEDIA_PLAYLIST_SUFFIX)
}

fn m3u8(body: String) -> Response {
    ([(header::CONTENT_TYPE, M3U8_CONTENT_TYPE)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_id() {
        assert_eq!(representation_id("media_playlist_v1.m3u8"), Some("v1"));
        assert_eq!(
            representation_id("media_playlist_video_1080p.m3u8"),
            Some("video_1080p")
        );
        assert_eq!(representation_id("media_playlist_.m3u8"), Some(""));
        assert_eq!(representation_id("media_playlist_v1.mpd"), None);
        assert_eq!(representation_id("playlist_v1.m3u8"), None);
        assert_eq!(representation_id("favicon.ico"), None);
    }
}
