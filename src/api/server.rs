//! API server setup and configuration.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::NotesError;
use crate::generate::NoteGenerator;

use super::{
    handlers::{generate_handler, hello_handler, upload_handler},
    types::ApiState,
};

/// Build the CORS policy: one origin, credentials allowed, and every
/// method/header the browser asks for.
///
/// Credentialed CORS forbids `*`, so methods and headers are mirrored from
/// the preflight request instead.
fn cors_layer(origin: &str) -> Result<CorsLayer, NotesError> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| NotesError::InvalidConfig(format!("Invalid CORS origin '{}': {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Create the API router with all routes configured.
///
/// Public so the routes can be embedded in a larger application or driven
/// directly with `tower::ServiceExt::oneshot` in tests.
///
/// # Errors
/// [`NotesError::InvalidConfig`] when `server.cors_origin` is not a valid
/// header value.
pub fn create_router(generator: Arc<NoteGenerator>, server: &ServerConfig) -> Result<Router, NotesError> {
    let state = ApiState { generator };

    Ok(Router::new()
        .route("/", get(hello_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(server.max_upload_bytes))
        .layer(cors_layer(&server.cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Bind `server.host:server.port` and serve until Ctrl-C.
pub async fn serve(generator: Arc<NoteGenerator>, server: &ServerConfig) -> Result<(), NotesError> {
    let addr = server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| NotesError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    serve_on(listener, generator, server).await
}

/// Serve on an already-bound listener (port 0 in tests).
pub async fn serve_on(
    listener: TcpListener,
    generator: Arc<NoteGenerator>,
    server: &ServerConfig,
) -> Result<(), NotesError> {
    let app = create_router(generator, server)?;

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Starting study-notes API server on http://{}", addr),
        Err(_) => tracing::info!("Starting study-notes API server"),
    }
    tracing::info!(
        "CORS origin: {}, upload limit: {} bytes",
        server.cors_origin,
        server.max_upload_bytes
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| NotesError::Internal(e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
