//! REST API for study-note generation.
//!
//! # Endpoints
//!
//! - `GET /` - liveness, always `{"message": "Hello World"}`
//! - `POST /api/generate` - notes from a JSON `{"raw_text": "..."}` body
//! - `POST /api/upload` - notes from a multipart upload (field `file`)
//!
//! Errors are returned as `{"detail": "..."}`: 400 for unusable uploads,
//! 500 when the model call or its output fails.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use study_notes::{NoteGenerator, NotesConfig, ServerConfig, api::serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), study_notes::NotesError> {
//!     let generator = Arc::new(NoteGenerator::new(NotesConfig::default()));
//!     serve(generator, &ServerConfig::default()).await
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! curl -X POST http://localhost:8000/api/generate \
//!      -H 'content-type: application/json' \
//!      -d '{"raw_text": "The mitochondria is the powerhouse of the cell."}'
//!
//! curl -F "file=@chapter3.pdf;type=application/pdf" http://localhost:8000/api/upload
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use handlers::UPLOAD_FIELD;
pub use server::{create_router, serve, serve_on};
pub use types::{ApiState, ErrorResponse, HelloResponse};
