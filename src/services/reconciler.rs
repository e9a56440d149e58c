use crate::models::ExtractionOutcome;
use crate::services::extractor::{InvokeError, ProcessCapture};

pub const PARSE_FAILURE: &str = "Failed to parse metrics from parser output.";

/// Turns captured extractor output into a single outcome.
///
/// Any diagnostic on stderr wins over stdout and the exit code. Otherwise
/// stdout must be JSON, which is returned exactly as parsed. The exit code
/// is never consulted on its own.
pub fn reconcile(capture: &ProcessCapture) -> ExtractionOutcome {
    if !capture.stderr.is_empty() {
        return ExtractionOutcome::failed(capture.stderr.trim());
    }

    match serde_json::from_str(&capture.stdout) {
        Ok(metrics) => {
            if capture.exit_code != Some(0) {
                tracing::warn!(
                    "Extractor exited with {:?} but produced clean output, accepting metrics",
                    capture.exit_code
                );
            }
            ExtractionOutcome::Metrics(metrics)
        }
        Err(e) => {
            tracing::debug!("Extractor stdout is not JSON: {}", e);
            ExtractionOutcome::failed(PARSE_FAILURE)
        }
    }
}

/// Folds invoker failures into the same logical-failure channel.
pub fn reconcile_invocation(result: Result<ProcessCapture, InvokeError>) -> ExtractionOutcome {
    match result {
        Ok(capture) => reconcile(&capture),
        Err(e) => ExtractionOutcome::failed(e.to_string()),
    }
}
