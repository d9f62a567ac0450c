//! API request handlers.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::debug;

use crate::error::NotesError;
use crate::notes::{NoteRequest, NoteResponse};

use super::{
    error::ApiError,
    types::{ApiState, HelloResponse},
};

/// Multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

pub async fn hello_handler() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World".to_string(),
    })
}

pub async fn generate_handler(
    State(state): State<ApiState>,
    Json(request): Json<NoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let notes = state.generator.generate(&request.raw_text).await?;
    Ok(Json(notes))
}

pub async fn upload_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<NoteResponse>, ApiError> {
    let mut upload: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| NotesError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) || upload.is_some() {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let content_type = field.content_type().map(|s| s.to_string());
        debug!(
            "Upload {:?} declared as {:?}",
            field.file_name().unwrap_or("<unnamed>"),
            content_type
        );
        let data = field
            .bytes()
            .await
            .map_err(|e| NotesError::InvalidUpload(e.to_string()))?;

        upload = Some((data.to_vec(), content_type));
    }

    let (data, content_type) = upload.ok_or(NotesError::MissingFile)?;
    let notes = state
        .generator
        .generate_from_upload(data, content_type.as_deref())
        .await?;
    Ok(Json(notes))
}
