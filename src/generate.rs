//! The shared generation routine behind both endpoints.
//!
//! [`NoteGenerator`] owns the model and the pipeline configuration. It is
//! built once at startup and shared read-only across requests.

use crate::config::NotesConfig;
use crate::error::NotesError;
use crate::notes::NoteResponse;
use crate::pipeline::llm::{LlmNoteModel, NoteModel};
use crate::pipeline::{input, postprocess};
use crate::prompts::build_prompt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Turns raw text or uploaded files into [`NoteResponse`]s.
pub struct NoteGenerator {
    model: Arc<dyn NoteModel>,
    config: NotesConfig,
}

impl NoteGenerator {
    /// Generator backed by the `edgequake_llm` provider named in `config`.
    ///
    /// No network call or key check happens here; a misconfigured provider
    /// surfaces on the first request.
    pub fn new(config: NotesConfig) -> Self {
        let model = Arc::new(LlmNoteModel::new(&config));
        Self { model, config }
    }

    /// Generator backed by a caller-supplied model.
    pub fn with_model(model: Arc<dyn NoteModel>, config: NotesConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Generate notes from raw study text.
    ///
    /// `raw_text` is forwarded unchanged. Makes exactly one model call.
    ///
    /// # Errors
    /// Any model failure, timeout, or schema mismatch; all are upstream
    /// (HTTP 500) errors.
    pub async fn generate(&self, raw_text: &str) -> Result<NoteResponse, NotesError> {
        let start = Instant::now();
        let prompt = build_prompt(self.config.system_prompt.as_deref(), raw_text);
        debug!(
            "Prompt for {}: {} chars ({} chars of study text)",
            self.model.label(),
            prompt.len(),
            raw_text.len()
        );

        let reply = match self.config.api_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), self.model.complete(&prompt))
                .await
                .map_err(|_| NotesError::ModelTimeout { secs })??,
            None => self.model.complete(&prompt).await?,
        };

        let notes = NoteResponse::from_model_json(&postprocess::clean_model_json(&reply)).map_err(|e| {
            warn!("Model reply failed validation: {}", e);
            e
        })?;

        let unmatched = notes.quiz.iter().filter(|q| !q.answer_matches_option()).count();
        if unmatched > 0 {
            debug!("{} quiz answer(s) do not match any option verbatim", unmatched);
        }

        info!(
            "Generated notes: {} key points, {} questions in {}ms",
            notes.key_points.len(),
            notes.quiz.len(),
            start.elapsed().as_millis()
        );
        Ok(notes)
    }

    /// Extract text from an uploaded file, then [`generate`](Self::generate).
    ///
    /// Extraction errors are client-input (HTTP 400) errors and prevent the
    /// model from being called at all.
    pub async fn generate_from_upload(
        &self,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<NoteResponse, NotesError> {
        let raw_text = input::extract_text(bytes, content_type, &self.config).await?;
        self.generate(&raw_text).await
    }
}

/// Generate notes with a one-off generator built from `config`.
///
/// Servers should build one [`NoteGenerator`] and reuse it; this is for
/// scripts and tests.
pub async fn generate_notes(raw_text: &str, config: &NotesConfig) -> Result<NoteResponse, NotesError> {
    NoteGenerator::new(config.clone()).generate(raw_text).await
}
