use crate::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

pub async fn index(State(state): State<AppState>) -> Response {
    let path = state.config.public_dir.join("index.html");
    match tokio::fs::read(&path).await {
        Ok(html) => (
            [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.to_string())],
            html,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading index.html").into_response()
        }
    }
}

pub async fn client_script(State(state): State<AppState>) -> Response {
    let path = state.config.public_dir.join("client.js");
    match tokio::fs::read(&path).await {
        Ok(js) => (
            [(header::CONTENT_TYPE, mime::APPLICATION_JAVASCRIPT_UTF_8.to_string())],
            js,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            not_found().await.into_response()
        }
    }
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
