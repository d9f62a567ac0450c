//! Configuration types for note generation and the HTTP server.
//!
//! [`NotesConfig`] controls the pipeline (model, prompt, OCR, pdfium) and is
//! built via [`NotesConfigBuilder`]. [`ServerConfig`] controls only the
//! listener and request-level policy (CORS origin, upload limit).
//!
//! Both are built once at process start and shared read-only by every
//! request.

use crate::error::NotesError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// Provider used when none is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the extraction + generation pipeline.
///
/// # Example
/// ```rust
/// use study_notes::NotesConfig;
///
/// let config = NotesConfig::builder()
///     .model("gemini-2.5-flash")
///     .api_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.provider_name, "gemini");
/// ```
#[derive(Clone)]
pub struct NotesConfig {
    /// LLM provider name understood by `edgequake_llm::ProviderFactory`
    /// (e.g. "gemini", "openai", "anthropic", "ollama"). Default: "gemini".
    ///
    /// The provider reads its credential from its own environment variable
    /// (`GEMINI_API_KEY` for the default). A missing key is only noticed on
    /// the first request.
    pub provider_name: String,

    /// Model identifier. Default: "gemini-2.5-flash".
    pub model: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. `None` keeps the provider default.
    pub temperature: Option<f32>,

    /// Maximum tokens the model may generate. `None` keeps the provider default.
    pub max_tokens: Option<usize>,

    /// Per-call timeout in seconds. `None` waits as long as the underlying
    /// HTTP client does.
    pub api_timeout_secs: Option<u64>,

    /// Custom instruction block. If None, uses
    /// [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu". Default: "eng".
    pub ocr_language: String,

    /// Tesseract executable name or path. Default: "tesseract".
    pub tesseract_cmd: String,

    /// Directory or file of the pdfium shared library. `None` tries the
    /// system library; without either, PDFs are read by `pdf-extract`.
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            provider_name: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
            temperature: None,
            max_tokens: None,
            api_timeout_secs: None,
            system_prompt: None,
            ocr_language: "eng".to_string(),
            tesseract_cmd: "tesseract".to_string(),
            pdfium_lib_path: None,
        }
    }
}

impl fmt::Debug for NotesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotesConfig")
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("ocr_language", &self.ocr_language)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .finish()
    }
}

impl NotesConfig {
    /// Create a new builder for `NotesConfig`.
    pub fn builder() -> NotesConfigBuilder {
        NotesConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`NotesConfig`].
#[derive(Debug)]
pub struct NotesConfigBuilder {
    config: NotesConfig,
}

impl NotesConfigBuilder {
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NotesConfig, NotesError> {
        let c = &self.config;
        if c.provider.is_none() && c.provider_name.trim().is_empty() {
            return Err(NotesError::InvalidConfig("provider name must not be empty".into()));
        }
        if c.model.trim().is_empty() {
            return Err(NotesError::InvalidConfig("model must not be empty".into()));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(NotesError::InvalidConfig("API timeout must be ≥ 1 second".into()));
        }
        if c.max_tokens == Some(0) {
            return Err(NotesError::InvalidConfig("max tokens must be ≥ 1".into()));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(NotesError::InvalidConfig("OCR language must not be empty".into()));
        }
        if let Some(ref prompt) = c.system_prompt {
            if prompt.trim().is_empty() {
                return Err(NotesError::InvalidConfig("system prompt must not be blank".into()));
            }
        }
        Ok(self.config)
    }
}

// ── Server ───────────────────────────────────────────────────────────────

/// Default upload limit in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

/// Listener and request-level settings for [`crate::api::serve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address. Default: "0.0.0.0".
    pub host: String,
    /// Bind port. Default: 8000.
    pub port: u16,
    /// The single origin allowed to call the API cross-origin, with
    /// credentials. Default: "http://localhost:3000".
    pub cors_origin: String,
    /// Maximum request body size in bytes, multipart uploads included.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origin: "http://localhost:3000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Set the upload limit from a megabyte count (minimum 1 MB, saturating
    /// at `usize::MAX` bytes).
    pub fn with_max_upload_mb(mut self, mb: usize) -> Self {
        self.max_upload_bytes = mb.max(1).saturating_mul(1024 * 1024);
        self
    }

    /// Parse `host:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, NotesError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| NotesError::InvalidConfig(format!("Invalid host address '{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
