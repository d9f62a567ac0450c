//! Pipeline stages for study-note generation.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the extractors can be swapped without touching the
//! model call.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─▶ pdf ─┐
//! input ─────┼─▶ ocr ─┼──▶ prompt ──▶ llm ──▶ postprocess ──▶ NoteResponse
//! (dispatch) └─ utf-8 ┘              (model)   (unwrap JSON)
//! ```
//!
//! 1. [`input`] picks an extractor from the declared content type
//! 2. [`pdf`] reads the text layer with pdfium, or `pdf-extract` when no
//!    pdfium is installed; runs in `spawn_blocking`
//! 3. [`ocr`] decodes images and shells out to Tesseract
//! 4. [`llm`] sends the assembled prompt; the only stage with network I/O
//! 5. [`postprocess`] strips fences around the JSON before strict parsing

pub mod input;
pub mod llm;
pub mod ocr;
pub mod pdf;
pub mod postprocess;
