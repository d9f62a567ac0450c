//! HTTP rendering of [`NotesError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::{ErrorClass, NotesError};

use super::types::ErrorResponse;

/// Wrapper that turns a [`NotesError`] into `{"detail": ...}` with the
/// matching status code.
#[derive(Debug)]
pub struct ApiError(pub NotesError);

impl From<NotesError> for ApiError {
    fn from(e: NotesError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.class() {
            ErrorClass::ClientInput => StatusCode::BAD_REQUEST,
            ErrorClass::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = self.0.to_string();

        if status.is_server_error() {
            error!("{} {}", status.as_u16(), detail);
        } else {
            warn!("{} {}", status.as_u16(), detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
