//! Error types for the study-notes library.
//!
//! Every failure is terminal for the request that hit it, so a single enum
//! covers the whole pipeline. Variants fall into exactly two classes, exposed
//! through [`NotesError::status`]:
//!
//! * **Client input** (400): the uploaded file has an unsupported content
//!   type, cannot be read in its declared format, or yields no text.
//! * **Upstream** (500): the model could not be reached or configured, or it
//!   answered with JSON that does not match [`crate::notes::NoteResponse`].
//!
//! The `Display` strings are the exact `detail` messages returned to HTTP
//! clients.

use thiserror::Error;

/// Content types accepted by the upload endpoint, in the order they are
/// listed back to the client.
pub const SUPPORTED_CONTENT_TYPES: &str = "application/pdf, image/png, image/jpeg, text/plain";

/// HTTP-level class of a [`NotesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller sent something we cannot turn into text (HTTP 400).
    ClientInput,
    /// The model call or its output failed (HTTP 500).
    Upstream,
}

/// All errors returned by the study-notes library.
#[derive(Debug, Error)]
pub enum NotesError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Declared content type is outside the supported set.
    #[error("Unsupported file type: {content_type}. Supported types: {}", SUPPORTED_CONTENT_TYPES)]
    UnsupportedContentType { content_type: String },

    /// The multipart body carried no `file` part.
    #[error("No file provided")]
    MissingFile,

    /// The multipart body itself could not be read.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The document could not be parsed or a page's text layer could not be read.
    #[error("Error processing PDF: {0}")]
    PdfProcessing(String),

    /// The PDF opened fine but every page was blank.
    #[error("Could not extract text from PDF")]
    EmptyPdf,

    /// The image could not be decoded or the OCR engine exited with an error.
    #[error("Error processing image: {0}")]
    ImageProcessing(String),

    /// OCR ran but recognised nothing.
    #[error("Could not extract text from image")]
    EmptyImage,

    /// A `text/plain` upload was not valid UTF-8.
    #[error("Error reading text file: {0}")]
    TextDecoding(#[from] std::string::FromUtf8Error),

    /// Extraction succeeded but produced only whitespace.
    #[error("No text content found in the file")]
    NoTextContent,

    // ── Model errors ──────────────────────────────────────────────────────
    /// The provider could not be constructed (unknown name, missing key).
    #[error("Failed to call AI model: provider '{provider}' is not configured: {hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The provider returned an error for the completion request.
    #[error("Failed to call AI model: {0}")]
    ModelCall(String),

    /// The completion did not finish within the configured timeout.
    #[error("Failed to call AI model: no response after {secs}s")]
    ModelTimeout { secs: u64 },

    /// The model answered, but not with a valid `NoteResponse` document.
    #[error("Failed to call AI model: {0}")]
    InvalidModelOutput(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task panic, temp file failure, OCR engine
    /// not installed).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotesError {
    /// Which side of the request is at fault.
    pub fn class(&self) -> ErrorClass {
        match self {
            NotesError::UnsupportedContentType { .. }
            | NotesError::MissingFile
            | NotesError::InvalidUpload(_)
            | NotesError::PdfProcessing(_)
            | NotesError::EmptyPdf
            | NotesError::ImageProcessing(_)
            | NotesError::EmptyImage
            | NotesError::TextDecoding(_)
            | NotesError::NoTextContent => ErrorClass::ClientInput,
            NotesError::ProviderNotConfigured { .. }
            | NotesError::ModelCall(_)
            | NotesError::ModelTimeout { .. }
            | NotesError::InvalidModelOutput(_)
            | NotesError::InvalidConfig(_)
            | NotesError::Internal(_) => ErrorClass::Upstream,
        }
    }

    /// HTTP status code for this error: 400 or 500.
    pub fn status(&self) -> u16 {
        match self.class() {
            ErrorClass::ClientInput => 400,
            ErrorClass::Upstream => 500,
        }
    }
}
