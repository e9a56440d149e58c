#![cfg(unix)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use rust_metrics_backend::config::ServiceConfig;
use rust_metrics_backend::{AppState, create_app};
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// App whose extractor is `sh -c <script> extractor <staged path>`
fn setup_app(dir: &TempDir, script: &str, timeout: Duration) -> Router {
    let config = ServiceConfig {
        staging_dir: dir.path().join("uploads"),
        extractor_program: "sh".to_string(),
        extractor_args: vec![
            "-c".to_string(),
            script.to_string(),
            "extractor".to_string(),
        ],
        extraction_timeout: timeout,
        ..ServiceConfig::default()
    };
    create_app(AppState::from_config(config))
}

async fn upload(app: Router, content: &[u8]) -> (StatusCode, Value) {
    let body = json!({
        "fileName": "a.pdf",
        "content": STANDARD.encode(content),
        "level": "basic"
    })
    .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_extractor_metrics_on_stdout() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, "echo '{\"revenue\": 100}'", Duration::from_secs(10));

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "metrics": { "revenue": 100 }, "level": "basic" }));
}

#[tokio::test]
async fn test_extractor_reads_decoded_bytes() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(
        &dir,
        "printf '{\"content\": \"%s\", \"ext\": \"%s\"}' \"$(cat \"$1\")\" \"${1##*.}\"",
        Duration::from_secs(10),
    );

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metrics"], json!({ "content": "hi", "ext": "pdf" }));
}

#[tokio::test]
async fn test_extractor_stderr_wins() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(
        &dir,
        "echo '{\"revenue\": 100}'; echo 'corrupt PDF' >&2",
        Duration::from_secs(10),
    );

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "metrics": { "error": "corrupt PDF" }, "level": "basic" })
    );
}

#[tokio::test]
async fn test_extractor_garbage_stdout() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, "echo 'Total for Income 100'", Duration::from_secs(10));

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["metrics"],
        json!({ "error": "Failed to parse metrics from parser output." })
    );
}

#[tokio::test]
async fn test_extractor_nonzero_exit_with_json_is_success() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, "echo '{\"revenue\": 5}'; exit 1", Duration::from_secs(10));

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metrics"], json!({ "revenue": 5 }));
}

#[tokio::test]
async fn test_extractor_timeout_is_logical_failure() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(&dir, "sleep 5", Duration::from_millis(200));

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["level"], "basic");
    assert_eq!(json["metrics"]["error"], "Extraction timed out after 200ms");
}

#[tokio::test]
async fn test_missing_extractor_is_logical_failure() {
    let dir = TempDir::new().unwrap();
    let config = ServiceConfig {
        staging_dir: dir.path().join("uploads"),
        extractor_program: "/nonexistent/extract_financial_metrics".to_string(),
        extractor_args: Vec::new(),
        ..ServiceConfig::default()
    };
    let app = create_app(AppState::from_config(config));

    let (status, json) = upload(app, b"hi").await;

    assert_eq!(status, StatusCode::OK);
    let error = json["metrics"]["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to start extractor"), "{}", error);
}
