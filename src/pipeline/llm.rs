//! Model interaction: send one prompt, get back raw JSON text.
//!
//! [`NoteModel`] is the seam between the generation routine and the hosted
//! model. The production implementation, [`LlmNoteModel`], drives any
//! `edgequake_llm` provider (Gemini by default); tests substitute a scripted
//! model so no network is involved.
//!
//! Exactly one attempt is made per call. Errors are converted to
//! [`NotesError::ModelCall`] with the provider's message embedded.

use crate::config::NotesConfig;
use crate::error::NotesError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// A hosted model able to complete a single prompt.
#[async_trait]
pub trait NoteModel: Send + Sync {
    /// Send `prompt` as one user turn and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, NotesError>;

    /// Short label for logs, e.g. `gemini/gemini-2.5-flash`.
    fn label(&self) -> String;
}

/// [`NoteModel`] backed by an `edgequake_llm` provider.
///
/// The provider is created on first use and then reused by every request.
/// Creation failures (unknown provider, missing API key) are not cached, so
/// setting the key and retrying the request is enough to recover.
pub struct LlmNoteModel {
    provider_name: String,
    model: String,
    options: CompletionOptions,
    provider: OnceCell<Arc<dyn LLMProvider>>,
}

impl LlmNoteModel {
    /// Build from the pipeline configuration; performs no I/O.
    pub fn new(config: &NotesConfig) -> Self {
        let provider = match config.provider {
            Some(ref p) => OnceCell::new_with(Some(Arc::clone(p))),
            None => OnceCell::new(),
        };
        Self {
            provider_name: config.provider_name.clone(),
            model: config.model.clone(),
            options: build_options(config),
            provider,
        }
    }

    async fn provider(&self) -> Result<&Arc<dyn LLMProvider>, NotesError> {
        self.provider
            .get_or_try_init(|| async { create_provider(&self.provider_name, &self.model) })
            .await
    }
}

#[async_trait]
impl NoteModel for LlmNoteModel {
    async fn complete(&self, prompt: &str) -> Result<String, NotesError> {
        let provider = self.provider().await?;
        let messages = vec![ChatMessage::user(prompt)];

        let start = Instant::now();
        match provider.chat(&messages, Some(&self.options)).await {
            Ok(response) => {
                info!(
                    "{}: {} input tokens, {} output tokens, {:?}",
                    self.label(),
                    response.prompt_tokens,
                    response.completion_tokens,
                    start.elapsed()
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!("{}: call failed after {:?}: {}", self.label(), start.elapsed(), e);
                Err(NotesError::ModelCall(e.to_string()))
            }
        }
    }

    fn label(&self) -> String {
        format!("{}/{}", self.provider_name, self.model)
    }
}

/// Instantiate a named provider; the provider reads its own API key
/// (`GEMINI_API_KEY`, `OPENAI_API_KEY` and so on) from the environment.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, NotesError> {
    debug!("Creating LLM provider {}/{}", provider_name, model);
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        NotesError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Build `CompletionOptions` from the configuration.
///
/// JSON output is always requested; sampling knobs are only sent when set.
fn build_options(config: &NotesConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        response_format: Some("json_object".to_string()),
        ..Default::default()
    }
}
