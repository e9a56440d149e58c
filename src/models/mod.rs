use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Validated `POST /upload` payload. `content` is still base64 text here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    pub content: String,
    #[serde(default)]
    pub level: String,
}

/// Result of one extraction attempt: the extractor's metrics or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Metrics(Value),
    Failed { error: String },
}

impl ExtractionOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        ExtractionOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed { .. })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Metric name to value, or `{ "error": string }`
    #[schema(value_type = Object)]
    pub metrics: ExtractionOutcome,
    pub level: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_serializes_untagged() {
        let ok = ExtractionOutcome::Metrics(json!({ "revenue": 100 }));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "revenue": 100 }));

        let failed = ExtractionOutcome::failed("corrupt PDF");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "error": "corrupt PDF" })
        );
        assert!(failed.is_failure());
    }

    #[test]
    fn test_response_shape() {
        let response = UploadResponse {
            metrics: ExtractionOutcome::Metrics(json!({ "revenue": 100 })),
            level: "basic".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "metrics": { "revenue": 100 }, "level": "basic" })
        );
    }
}
