//! Image OCR: decode a PNG/JPEG upload and read it with Tesseract.
//!
//! The upload is decoded with the `image` crate first, so a corrupt file is
//! reported as such instead of as an opaque OCR failure, then re-encoded as
//! lossless PNG into a temp file for the `tesseract` binary.

use crate::config::NotesConfig;
use crate::error::NotesError;
use image::DynamicImage;
use std::io::{Cursor, Write};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Run OCR over an encoded image and return the recognised text.
///
/// Blank output is returned as-is; the caller decides whether it is an
/// error.
pub async fn ocr_image(bytes: Vec<u8>, config: &NotesConfig) -> Result<String, NotesError> {
    let png = tokio::task::spawn_blocking(move || decode_to_png(&bytes))
        .await
        .map_err(|e| NotesError::Internal(format!("Image decode task panicked: {}", e)))??;

    let mut tmp = tempfile::Builder::new()
        .prefix("study-notes-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| NotesError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(&png)
        .map_err(|e| NotesError::Internal(format!("tempfile write: {e}")))?;

    debug!(
        "Running {} on {} ({} bytes)",
        config.tesseract_cmd,
        tmp.path().display(),
        png.len()
    );

    let output = Command::new(&config.tesseract_cmd)
        .arg(tmp.path())
        .arg("stdout")
        .arg("-l")
        .arg(&config.ocr_language)
        .output()
        .await
        .map_err(|e| {
            // A missing OCR engine is a deployment fault, not a bad upload.
            NotesError::Internal(format!(
                "could not run '{}': {}. Is tesseract installed and on PATH?",
                config.tesseract_cmd, e
            ))
        })?;
    // `tmp` is dropped (and the file deleted) when this function returns

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("tesseract exited with {}: {}", output.status, stderr.trim());
        return Err(NotesError::ImageProcessing(format!(
            "tesseract exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    info!("OCR recognised {} chars", text.trim().len());
    Ok(text)
}

/// Decode any supported raster format and re-encode it as PNG.
fn decode_to_png(bytes: &[u8]) -> Result<Vec<u8>, NotesError> {
    let img: DynamicImage =
        image::load_from_memory(bytes).map_err(|e| NotesError::ImageProcessing(e.to_string()))?;
    debug!("Decoded image {}x{}", img.width(), img.height());

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| NotesError::ImageProcessing(e.to_string()))?;
    Ok(buf)
}
