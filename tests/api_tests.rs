//! Integration tests for the HTTP API, driven through the router with a
//! scripted model so no network access is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use study_notes::{
    NoteGenerator, NoteModel, NoteResponse, NotesConfig, NotesError, ServerConfig,
    api::{ErrorResponse, HelloResponse, create_router},
};

const NOTES_JSON: &str = r#"{
  "summary": "Cells turn glucose into ATP.",
  "key_points": ["Glycolysis", "Krebs cycle", "Electron transport", "ATP yield", "Oxygen"],
  "quiz": [
    {"question": "Where does glycolysis occur?",
     "options": ["A) Cytoplasm", "B) Nucleus", "C) Ribosome", "D) Golgi"],
     "answer": "A) Cytoplasm"}
  ]
}"#;

const BOUNDARY: &str = "----studynotesboundary";

/// Model that answers every prompt with the same reply.
struct Scripted {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(msg.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl NoteModel for Scripted {
    async fn complete(&self, prompt: &str) -> Result<String, NotesError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(NotesError::ModelCall)
    }

    fn label(&self) -> String {
        "scripted".to_string()
    }
}

fn app(model: Arc<Scripted>) -> Router {
    app_with_config(model, NotesConfig::default())
}

fn app_with_config(model: Arc<Scripted>, config: NotesConfig) -> Router {
    let generator = Arc::new(NoteGenerator::with_model(model, config));
    create_router(generator, &ServerConfig::default()).unwrap()
}

/// Minimal PDF with one page per entry; an empty entry is a blank page.
fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
    let n = texts.len();
    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 4 + i * 2)).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), n),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
    ];
    for (i, text) in texts.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 300 200] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + i * 2
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 18 Tf 20 100 Td ({text}) Tj ET")
        };
        objects.push(format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, obj) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{obj}\nendobj\n", i + 1));
    }
    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for off in offsets {
        out.push_str(&format!("{off:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.into_bytes()
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Single-part multipart body with the given field name and content type.
fn upload_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn detail(response: axum::response::Response) -> String {
    let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    err.detail
}

// ── GET / ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_hello_endpoint() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let hello: HelloResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(hello.message, "Hello World");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_hello_ignores_headers() {
    let response = app(Scripted::replying(NOTES_JSON))
        .oneshot(
            Request::builder()
                .uri("/?anything=1")
                .header("x-whatever", "yes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({"message": "Hello World"}));
}

// ── POST /api/generate ───────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_returns_notes() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(generate_request(json!({"raw_text": "Cellular respiration..."})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let notes: NoteResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(notes.summary, "Cells turn glucose into ATP.");
    assert_eq!(notes.key_points.len(), 5);
    assert_eq!(notes.quiz[0].answer, "A) Cytoplasm");

    assert_eq!(model.calls(), 1);
    assert!(model.last_prompt().ends_with("Here is the text:\n\nCellular respiration..."));
}

#[tokio::test]
async fn test_generate_accepts_empty_text() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(generate_request(json!({"raw_text": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_generate_model_failure_is_500() {
    let response = app(Scripted::failing("quota exceeded"))
        .oneshot(generate_request(json!({"raw_text": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = detail(response).await;
    assert!(detail.contains("quota exceeded"), "got {detail:?}");
}

#[tokio::test]
async fn test_generate_schema_mismatch_is_500() {
    let model = Scripted::replying(r#"{"summary": "only a summary"}"#);
    let response = app(model.clone())
        .oneshot(generate_request(json!({"raw_text": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = detail(response).await;
    assert!(detail.starts_with("Failed to call AI model"), "got {detail:?}");
    assert!(detail.contains("missing field"), "got {detail:?}");
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_generate_non_json_reply_is_500() {
    let response = app(Scripted::replying("Sure! Here are your notes."))
        .oneshot(generate_request(json!({"raw_text": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_generate_missing_raw_text_is_rejected() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(generate_request(json!({"text": "wrong field"})))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(model.calls(), 0);
}

// ── POST /api/upload ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_text_file() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "text/plain", b"Mitosis has four phases."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let notes: NoteResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(notes.quiz.len(), 1);
    assert!(model.last_prompt().ends_with("Mitosis has four phases."));
}

#[tokio::test]
async fn test_upload_content_type_parameters_ignored() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "text/plain; charset=utf-8", b"Osmosis"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_upload_unsupported_type_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "application/zip", b"PK\x03\x04"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let detail = detail(response).await;
    assert!(
        detail.starts_with("Unsupported file type: application/zip"),
        "got {detail:?}"
    );
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_invalid_utf8_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "text/plain", &[0x66, 0x6f, 0xff, 0xfe, 0x6f]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.starts_with("Error reading text file"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_blank_text_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "text/plain", b"  \n\t \n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(response).await, "No text content found in the file");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_without_file_field_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("document", "text/plain", b"wrong field name"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_empty_multipart_is_400() {
    let response = app(Scripted::replying(NOTES_JSON))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(format!("--{BOUNDARY}--\r\n")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_model_failure_is_500() {
    let response = app(Scripted::failing("upstream down"))
        .oneshot(upload_request("file", "text/plain", b"Some notes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(detail(response).await.contains("upstream down"));
}

#[tokio::test]
async fn test_upload_schema_mismatch_is_500() {
    let model = Scripted::replying(r#"{"summary": "s", "key_points": "not a list", "quiz": []}"#);
    let response = app(model.clone())
        .oneshot(upload_request("file", "text/plain", b"Some notes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = detail(response).await;
    assert!(detail.contains("invalid type"), "got {detail:?}");
    assert_eq!(model.calls(), 1);
}

// ── PDF uploads ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_pdf_reaches_model() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "application/pdf", &pdf_with_pages(&["Photosynthesis"])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);
    assert!(model.last_prompt().contains("Photosynthesis"));
}

#[tokio::test]
async fn test_upload_blank_pdf_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "application/pdf", &pdf_with_pages(&["", ""])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(response).await, "Could not extract text from PDF");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_broken_pdf_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "application/pdf", b"%PDF-1.4\n%%EOF\n"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.starts_with("Error processing PDF"));
    assert_eq!(model.calls(), 0);
}

// ── Image uploads ────────────────────────────────────────────────────────

fn encoded_image(format: image::ImageFormat) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(16, 16, image::Rgb([255, 255, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), format).unwrap();
    buf
}

/// Shell script standing in for `tesseract`; `body` decides what it prints.
#[cfg(unix)]
fn fake_tesseract(dir: &tempfile::TempDir, body: &str) -> NotesConfig {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.path().join("tesseract");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    NotesConfig::builder()
        .tesseract_cmd(path.to_string_lossy())
        .build()
        .unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn test_upload_image_reaches_model() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_tesseract(&dir, "echo 'Krebs cycle'");
    let model = Scripted::replying(NOTES_JSON);
    let response = app_with_config(model.clone(), config)
        .oneshot(upload_request("file", "image/jpeg", &encoded_image(image::ImageFormat::Jpeg)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(model.last_prompt().contains("Krebs cycle"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_upload_blank_ocr_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let config = fake_tesseract(&dir, "printf '  \\n'");
    let model = Scripted::replying(NOTES_JSON);
    let response = app_with_config(model.clone(), config)
        .oneshot(upload_request("file", "image/png", &encoded_image(image::ImageFormat::Png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(response).await, "Could not extract text from image");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_corrupt_image_is_400() {
    let model = Scripted::replying(NOTES_JSON);
    let response = app(model.clone())
        .oneshot(upload_request("file", "image/png", b"\x89PNG but truncated"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.starts_with("Error processing image"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_upload_without_ocr_engine_is_500() {
    let config = NotesConfig::builder()
        .tesseract_cmd("/definitely/not/tesseract")
        .build()
        .unwrap();
    let model = Scripted::replying(NOTES_JSON);
    let response = app_with_config(model.clone(), config)
        .oneshot(upload_request("file", "image/png", &encoded_image(image::ImageFormat::Png)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(model.calls(), 0);
}

// ── CORS ─────────────────────────────────────────────────────────────────

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/generate")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_preflight_allowed_origin() {
    let response = app(Scripted::replying(NOTES_JSON))
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_cors_other_origin_not_allowed() {
    let response = app(Scripted::replying(NOTES_JSON))
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_cors_simple_request_carries_credentials() {
    let response = app(Scripted::replying(NOTES_JSON))
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}
