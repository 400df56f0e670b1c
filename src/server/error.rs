//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`mpd2hls_common::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on translation errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mpd2hls_common::Error;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Request failed"
            );
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
        }

        // Plain-text body, never a partial playlist or key document.
        (status, self.0.to_string()).into_response()
    }
}
