//! HTTP server binary for study-notes.
//!
//! A thin shim over the library crate that maps CLI flags (or their
//! environment variables) to `NotesConfig` + `ServerConfig` and serves.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use study_notes::{api, NoteGenerator, NotesConfig, ServerConfig};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"ENDPOINTS:
  GET  /               {"message": "Hello World"}
  POST /api/generate   {"raw_text": "..."}  ->  notes JSON
  POST /api/upload     multipart field "file" (PDF, PNG, JPEG, plain text)

EXAMPLES:
  # Serve on 0.0.0.0:8000 with Gemini (reads GEMINI_API_KEY)
  study-notes

  # Local only, different port, 60s timeout on the model call
  study-notes --host 127.0.0.1 --port 9000 --api-timeout 60

  # Another provider supported by edgequake-llm
  study-notes --provider openai --model gpt-4.1-mini

  # Try it
  curl -X POST localhost:8000/api/generate -H 'content-type: application/json' \
       -d '{"raw_text": "Water boils at 100 C at sea level."}'
  curl -F "file=@notes.pdf;type=application/pdf" localhost:8000/api/upload

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key (with --provider openai)
  ANTHROPIC_API_KEY       Anthropic API key (with --provider anthropic)
  PDFIUM_LIB_PATH         Directory or file of libpdfium (optional, PDF uploads)
  TESSERACT_CMD           tesseract executable (image uploads)
  RUST_LOG                Overrides --verbose / --quiet

  Variables can also be placed in a .env file in the working directory.
"#;

/// Generate study notes (summary, key points, quiz) from text and files.
#[derive(Parser, Debug)]
#[command(
    name = "study-notes",
    version,
    about = "HTTP service that turns study text, PDFs and images into notes and quizzes",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "STUDY_NOTES_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind.
    #[arg(short, long, env = "STUDY_NOTES_PORT", default_value_t = 8000)]
    port: u16,

    /// The single origin allowed to call the API from a browser.
    #[arg(long, env = "STUDY_NOTES_CORS_ORIGIN", default_value = "http://localhost:3000")]
    cors_origin: String,

    /// Maximum upload size in megabytes.
    #[arg(long, env = "STUDY_NOTES_MAX_UPLOAD_MB", default_value_t = 25)]
    max_upload_mb: usize,

    /// LLM provider: gemini, openai, anthropic, mistral, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER", default_value = study_notes::config::DEFAULT_PROVIDER)]
    provider: String,

    /// LLM model ID.
    #[arg(long, env = "EDGEQUAKE_MODEL", default_value = study_notes::config::DEFAULT_MODEL)]
    model: String,

    /// LLM temperature (0.0 to 2.0). Provider default when unset.
    #[arg(long, env = "STUDY_NOTES_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max LLM output tokens. Provider default when unset.
    #[arg(long, env = "STUDY_NOTES_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Timeout for the model call in seconds. No override when unset.
    #[arg(long, env = "STUDY_NOTES_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Path to a text file replacing the built-in instructions.
    #[arg(long, env = "STUDY_NOTES_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Tesseract language code(s), e.g. eng or eng+deu.
    #[arg(long, env = "STUDY_NOTES_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// Tesseract executable.
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    tesseract: String,

    /// Directory or file of the pdfium shared library. The built-in parser is
    /// used when no pdfium can be loaded.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "STUDY_NOTES_VERBOSE")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, env = "STUDY_NOTES_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let notes_config = build_notes_config(&cli).await?;
    let server_config = ServerConfig {
        host: cli.host.clone(),
        port: cli.port,
        cors_origin: cli.cors_origin.clone(),
        ..ServerConfig::default()
    }
    .with_max_upload_mb(cli.max_upload_mb);

    tracing::info!(
        "Notes via {}/{} (timeout: {})",
        notes_config.provider_name,
        notes_config.model,
        notes_config
            .api_timeout_secs
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| "none".to_string())
    );

    // ── Serve ────────────────────────────────────────────────────────────
    let generator = Arc::new(NoteGenerator::new(notes_config));
    api::serve(generator, &server_config)
        .await
        .context("Server failed")?;

    Ok(())
}

/// Map CLI args to `NotesConfig`.
async fn build_notes_config(cli: &Cli) -> Result<NotesConfig> {
    let mut builder = NotesConfig::builder()
        .provider_name(&cli.provider)
        .model(&cli.model)
        .ocr_language(&cli.ocr_lang)
        .tesseract_cmd(&cli.tesseract);

    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}
