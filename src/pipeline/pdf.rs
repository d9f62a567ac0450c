//! PDF text extraction.
//!
//! pdfium reads the embedded text layer page by page when a library can be
//! bound (the configured path first, then the system library). Without one,
//! the pure-Rust `pdf-extract` parser takes over, so PDF uploads work on a
//! bare deployment. Scanned PDFs without a text layer come back blank and
//! are rejected by the caller.
//!
//! pdfium keeps thread-local state and is not safe to call from async
//! contexts, so all work happens inside `spawn_blocking`.

use crate::error::NotesError;
use pdfium_render::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extract the text of every page, pages separated by newlines.
///
/// Does not judge the result: a document of blank pages returns only
/// whitespace.
///
/// # Errors
/// [`NotesError::PdfProcessing`] when the bytes are not a readable PDF.
pub async fn extract_pdf_text(
    bytes: Vec<u8>,
    pdfium_lib_path: Option<PathBuf>,
) -> Result<String, NotesError> {
    tokio::task::spawn_blocking(move || extract_pdf_text_blocking(&bytes, pdfium_lib_path.as_deref()))
        .await
        .map_err(|e| NotesError::Internal(format!("PDF task failed: {}", e)))?
}

/// Blocking implementation of text extraction.
fn extract_pdf_text_blocking(bytes: &[u8], lib_path: Option<&Path>) -> Result<String, NotesError> {
    match bind(lib_path) {
        Some(bindings) => extract_with_pdfium(&Pdfium::new(bindings), bytes),
        None => extract_with_pdf_extract(bytes),
    }
}

fn extract_with_pdfium(pdfium: &Pdfium, bytes: &[u8]) -> Result<String, NotesError> {
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| NotesError::PdfProcessing(format!("{}", e)))?;

    let pages = document.pages();
    info!("PDF loaded with pdfium: {} pages, {} bytes", pages.len(), bytes.len());

    let mut text = String::with_capacity(bytes.len() / 4);
    for (idx, page) in pages.iter().enumerate() {
        let page_text = page
            .text()
            .map_err(|e| NotesError::PdfProcessing(format!("page {}: {}", idx + 1, e)))?
            .all();
        debug!("Page {}: {} chars", idx + 1, page_text.len());
        text.push_str(&page_text);
        text.push('\n');
    }

    Ok(text)
}

/// Pure-Rust fallback. `pdf-extract` panics on some malformed inputs, which
/// are reported as unreadable PDFs.
fn extract_with_pdf_extract(bytes: &[u8]) -> Result<String, NotesError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| NotesError::PdfProcessing("malformed PDF structure".to_string()))?;

    let text = result.map_err(|e| NotesError::PdfProcessing(e.to_string()))?;
    info!("PDF read with pdf-extract: {} bytes, {} chars", bytes.len(), text.len());
    Ok(text)
}

/// Bind to the configured pdfium library, then the system one.
///
/// `None` means no pdfium is available and the fallback parser is used.
fn bind(lib_path: Option<&Path>) -> Option<Box<dyn PdfiumLibraryBindings>> {
    if let Some(path) = lib_path {
        let result = if path.is_dir() {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
        } else {
            Pdfium::bind_to_library(path)
        };
        match result {
            Ok(bindings) => return Some(bindings),
            Err(e) => warn!("Failed to bind pdfium at {}: {}", path.display(), e),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => Some(bindings),
        Err(e) => {
            debug!("No system pdfium ({}); using pdf-extract", e);
            None
        }
    }
}
