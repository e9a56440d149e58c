use crate::api::error::AppError;
use crate::models::UploadResponse;
use crate::services::analyzer::DocumentAnalyzer;
use crate::services::decoder::{DecodedUpload, decode_upload};
use crate::services::staging::UploadStager;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Sequences decode, stage, analyze and reconcile for one upload.
pub struct AnalysisService {
    stager: UploadStager,
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl AnalysisService {
    pub fn new(stager: UploadStager, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self { stager, analyzer }
    }

    pub async fn process(&self, body: &[u8]) -> Result<UploadResponse, AppError> {
        let DecodedUpload { request, bytes } = decode_upload(body)?;

        let staged = self.stager.stage(&request.file_name, &bytes).await?;
        drop(bytes);

        let start = Instant::now();
        info!(
            "📄 Analyzing '{}' ({} bytes, level '{}') with {}",
            staged.display_name,
            staged.size,
            request.level,
            self.analyzer.name()
        );

        let metrics = self.analyzer.analyze(&staged).await;

        info!(
            "📊 Analysis of '{}' finished in {:?} ({})",
            staged.display_name,
            start.elapsed(),
            if metrics.is_failure() { "error" } else { "ok" }
        );

        // Staged copy goes away here unless retention is configured
        drop(staged);

        Ok(UploadResponse {
            metrics,
            level: request.level,
        })
    }
}
