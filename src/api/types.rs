//! API state and response bodies not covered by [`crate::notes`].

use crate::generate::NoteGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared, read-only router state.
#[derive(Clone)]
pub struct ApiState {
    pub generator: Arc<NoteGenerator>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

/// Body of every 4xx/5xx produced by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
