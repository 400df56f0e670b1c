//! ClearKey key-set handler.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use mpd2hls_media::keys;

use super::{error::AppError, AppContext};

/// `GET /keys`
pub async fn key_set(State(ctx): State<AppContext>) -> Result<Response, AppError> {
    let material = ctx.keys.fetch().await?;
    let body = keys::key_set(&material).to_json()?;

    tracing::debug!(kid = %material.kid_hex(), "Serving key set");

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
