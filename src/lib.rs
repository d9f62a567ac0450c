//! # study-notes
//!
//! Turn raw study material into structured notes: a short summary, five key
//! points, and a multiple-choice quiz, generated by a hosted LLM (Gemini by
//! default) and validated against a fixed JSON schema.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text / PDF / PNG / JPEG / TXT
//!  │
//!  ├─ 1. Input    dispatch on the declared content type
//!  ├─ 2. Extract  PDF text layer, Tesseract OCR, or strict UTF-8
//!  ├─ 3. Prompt   fixed instructions + "Here is the text:" + raw text
//!  ├─ 4. LLM      one JSON-mode call through edgequake-llm
//!  └─ 5. Validate strict parse into NoteResponse
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use study_notes::{generate_notes, NotesConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY on first use
//!     let config = NotesConfig::default();
//!     let notes = generate_notes("Photosynthesis turns light into sugar.", &config).await?;
//!     println!("{}", notes.summary);
//!     for q in &notes.quiz {
//!         println!("{} -> {}", q.question, q.answer);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Runtime requirements
//!
//! | Input | Needs |
//! |-------|-------|
//! | PDF   | nothing; libpdfium (system library or `PDFIUM_LIB_PATH`) is used when present |
//! | PNG/JPEG | `tesseract` on `PATH` with the configured language data |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `study-notes` server binary (clap + anyhow + tracing-subscriber + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod generate;
pub mod notes;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{NotesConfig, NotesConfigBuilder, ServerConfig};
pub use error::{ErrorClass, NotesError};
pub use generate::{generate_notes, NoteGenerator};
pub use notes::{NoteQuiz, NoteRequest, NoteResponse};
pub use pipeline::input::{extract_text, SourceKind};
pub use pipeline::llm::{LlmNoteModel, NoteModel};
