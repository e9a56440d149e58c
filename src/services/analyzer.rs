use crate::config::ServiceConfig;
use crate::models::ExtractionOutcome;
use crate::services::extractor::ExtractionInvoker;
use crate::services::reconciler::reconcile_invocation;
use crate::services::staging::StagedFile;

/// Trait for metric extraction backends
///
/// Implementations never fail at the transport level: every problem is
/// reported through `ExtractionOutcome::Failed`.
#[async_trait::async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Extract metrics from a staged document
    async fn analyze(&self, file: &StagedFile) -> ExtractionOutcome;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Runs an external process and reconciles its output
pub struct SubprocessAnalyzer {
    invoker: ExtractionInvoker,
}

impl SubprocessAnalyzer {
    pub fn new(invoker: ExtractionInvoker) -> Self {
        Self { invoker }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(ExtractionInvoker::from_config(config))
    }
}

#[async_trait::async_trait]
impl DocumentAnalyzer for SubprocessAnalyzer {
    async fn analyze(&self, file: &StagedFile) -> ExtractionOutcome {
        let result = self.invoker.run(file.path()).await;
        if let Err(e) = &result {
            tracing::warn!("Extraction of '{}' failed: {}", file.display_name, e);
        }
        reconcile_invocation(result)
    }

    fn name(&self) -> &str {
        self.invoker.program()
    }
}

/// Analyzer that returns fixed metrics (for testing)
#[cfg(test)]
pub struct FixedAnalyzer(pub serde_json::Value);

#[cfg(test)]
#[async_trait::async_trait]
impl DocumentAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _file: &StagedFile) -> ExtractionOutcome {
        ExtractionOutcome::Metrics(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
