use crate::AppState;
use crate::api::error::AppError;
use crate::models::{ErrorResponse, UploadRequest, UploadResponse};
use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use bytes::Bytes;

#[utoipa::path(
    post,
    path = "/upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Extraction finished; metrics may carry an error", body = UploadResponse),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 413, description = "Payload too large", body = ErrorResponse),
        (status = 500, description = "Upload could not be staged", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn upload_document(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let body = body.map_err(body_rejection)?;
    let service = state.analysis.clone();

    // Detached so a client disconnect does not abort the extraction midway;
    // a panic inside the pipeline still becomes a JSON 500.
    let response = tokio::spawn(async move { service.process(&body).await })
        .await
        .map_err(|e| AppError::Internal(format!("Upload pipeline aborted: {}", e)))??;

    Ok(Json(response))
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::BadRequest(rejection.body_text())
    }
}
