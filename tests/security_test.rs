use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_metrics_backend::config::ServiceConfig;
use rust_metrics_backend::models::ExtractionOutcome;
use rust_metrics_backend::services::analyzer::DocumentAnalyzer;
use rust_metrics_backend::services::staging::StagedFile;
use rust_metrics_backend::{AppState, create_app};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Reports where the document was staged
#[derive(Default)]
struct PathEchoAnalyzer {
    staged: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl DocumentAnalyzer for PathEchoAnalyzer {
    async fn analyze(&self, file: &StagedFile) -> ExtractionOutcome {
        self.staged.lock().unwrap().push(file.path().to_path_buf());
        ExtractionOutcome::Metrics(json!({ "display_name": file.display_name }))
    }

    fn name(&self) -> &str {
        "path-echo"
    }
}

async fn post_upload(app: Router, body: String) -> (StatusCode, Value) {
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
async fn test_path_traversal_name_is_contained() {
    let dir = TempDir::new().unwrap();
    let staging = dir.path().join("uploads");
    let analyzer = Arc::new(PathEchoAnalyzer::default());
    let config = ServiceConfig {
        staging_dir: staging.clone(),
        ..ServiceConfig::default()
    };
    let app = create_app(AppState::new(config, analyzer.clone()));

    let body = json!({
        "fileName": "../../../etc/passwd",
        "content": "aGk=",
        "level": "basic"
    })
    .to_string();
    let (status, json) = post_upload(app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metrics"]["display_name"], "passwd");

    let staged = analyzer.staged.lock().unwrap().clone();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].parent().unwrap(), staging);
    assert!(!staged[0].ends_with("passwd"));
    assert!(!dir.path().join("etc").exists());
}

#[tokio::test]
async fn test_nameless_file_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let analyzer = Arc::new(PathEchoAnalyzer::default());
    let config = ServiceConfig {
        staging_dir: dir.path().join("uploads"),
        ..ServiceConfig::default()
    };
    let app = create_app(AppState::new(config, analyzer.clone()));

    let body = json!({ "fileName": "..", "content": "aGk=", "level": "basic" }).to_string();
    let (status, json) = post_upload(app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid fileName" }));
    assert!(analyzer.staged.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_413_json() {
    let dir = TempDir::new().unwrap();
    let config = ServiceConfig {
        staging_dir: dir.path().join("uploads"),
        max_upload_size: 1024,
        ..ServiceConfig::default()
    };
    let app = create_app(AppState::new(config, Arc::new(PathEchoAnalyzer::default())));

    let body = json!({
        "fileName": "big.pdf",
        "content": "A".repeat(4096),
        "level": "basic"
    })
    .to_string();
    let (status, json) = post_upload(app, body).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_unwritable_staging_dir_is_500_json() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("occupied");
    tokio::fs::write(&blocker, b"not a directory").await.unwrap();

    let config = ServiceConfig {
        staging_dir: blocker.join("uploads"),
        ..ServiceConfig::default()
    };
    let app = create_app(AppState::new(config, Arc::new(PathEchoAnalyzer::default())));

    let body = json!({ "fileName": "a.pdf", "content": "aGk=", "level": "basic" }).to_string();
    let (status, json) = post_upload(app, body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Failed to stage upload" }));
}
