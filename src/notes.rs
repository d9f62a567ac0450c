//! Request and response documents.
//!
//! These three shapes are the whole public data model: the client sends a
//! [`NoteRequest`] (or a file), and both the client and the model must
//! produce a [`NoteResponse`]. Validation is structural only: field names
//! and JSON types must match, counts do not. The prompt asks for five key
//! points and four options per question, but a model that returns six
//! points still yields a valid response.

use crate::error::NotesError;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRequest {
    pub raw_text: String,
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteQuiz {
    pub question: String,
    /// Expected to hold four entries labelled A) to D).
    pub options: Vec<String>,
    /// Expected to equal one of `options` verbatim; not enforced.
    pub answer: String,
}

impl NoteQuiz {
    /// Whether `answer` appears verbatim among `options`.
    pub fn answer_matches_option(&self) -> bool {
        self.options.iter().any(|o| o == &self.answer)
    }
}

/// Structured study notes: the response of both generation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteResponse {
    pub summary: String,
    pub key_points: Vec<String>,
    pub quiz: Vec<NoteQuiz>,
}

impl NoteResponse {
    /// Parse the model's JSON text into a `NoteResponse`.
    ///
    /// Unknown fields are ignored; missing fields and type mismatches are
    /// errors.
    pub fn from_model_json(text: &str) -> Result<Self, NotesError> {
        Ok(serde_json::from_str(text)?)
    }
}
