//! Input dispatch: turn an uploaded file into raw study text.
//!
//! The declared content type alone decides the extractor; bytes are never
//! sniffed. An unsupported type is rejected before any bytes are touched, so
//! it can never reach the model.

use crate::config::NotesConfig;
use crate::error::NotesError;
use crate::pipeline::{ocr, pdf};
use tracing::{debug, info};

/// The extractor chosen for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `application/pdf`
    Pdf,
    /// `image/png`
    Png,
    /// `image/jpeg`
    Jpeg,
    /// `text/plain`
    PlainText,
}

impl SourceKind {
    /// Map a declared content type to an extractor.
    ///
    /// Parameters (`; charset=utf-8`) and letter case are ignored. A missing
    /// content type is treated as `application/octet-stream`.
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, NotesError> {
        let declared = content_type.unwrap_or("application/octet-stream");
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Ok(SourceKind::Pdf),
            "image/png" => Ok(SourceKind::Png),
            "image/jpeg" => Ok(SourceKind::Jpeg),
            "text/plain" => Ok(SourceKind::PlainText),
            _ => Err(NotesError::UnsupportedContentType {
                content_type: declared.to_string(),
            }),
        }
    }

    /// Canonical MIME type.
    pub fn mime_type(self) -> &'static str {
        match self {
            SourceKind::Pdf => "application/pdf",
            SourceKind::Png => "image/png",
            SourceKind::Jpeg => "image/jpeg",
            SourceKind::PlainText => "text/plain",
        }
    }
}

/// Extract study text from an uploaded file.
///
/// Returns the text unchanged (not trimmed) when it contains anything other
/// than whitespace.
///
/// # Errors
/// - [`NotesError::UnsupportedContentType`] for anything but the four
///   supported types
/// - [`NotesError::PdfProcessing`] / [`NotesError::EmptyPdf`]
/// - [`NotesError::ImageProcessing`] / [`NotesError::EmptyImage`]
/// - [`NotesError::TextDecoding`] for invalid UTF-8
/// - [`NotesError::NoTextContent`] when the result is blank
pub async fn extract_text(
    bytes: Vec<u8>,
    content_type: Option<&str>,
    config: &NotesConfig,
) -> Result<String, NotesError> {
    let kind = SourceKind::from_content_type(content_type)?;
    info!("Extracting text from {} upload ({} bytes)", kind.mime_type(), bytes.len());

    let text = match kind {
        SourceKind::Pdf => {
            let text = pdf::extract_pdf_text(bytes, config.pdfium_lib_path.clone()).await?;
            if text.trim().is_empty() {
                return Err(NotesError::EmptyPdf);
            }
            text
        }
        SourceKind::Png | SourceKind::Jpeg => {
            let text = ocr::ocr_image(bytes, config).await?;
            if text.trim().is_empty() {
                return Err(NotesError::EmptyImage);
            }
            text
        }
        SourceKind::PlainText => String::from_utf8(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(NotesError::NoTextContent);
    }

    debug!("Extracted {} chars", text.len());
    Ok(text)
}
