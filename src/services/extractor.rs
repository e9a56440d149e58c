use crate::config::ServiceConfig;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Semaphore;

/// Everything the extractor produced before it exited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessCapture {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Failed to start extractor '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Extractor I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extractor pool is shut down")]
    Unavailable,
}

/// Runs the external extraction process against a staged file.
///
/// The staged path is appended as the final positional argument. At most
/// `max_concurrent` processes run at once; further callers wait for a
/// permit without blocking the runtime.
#[derive(Debug, Clone)]
pub struct ExtractionInvoker {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl ExtractionInvoker {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            config.extractor_program.clone(),
            config.extractor_args.clone(),
            config.extraction_timeout,
            config.max_concurrent_extractions,
        )
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub async fn run(&self, file: &Path) -> Result<ProcessCapture, InvokeError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| InvokeError::Unavailable)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| InvokeError::Launch {
                program: self.program.clone(),
                source,
            })?;

        tracing::debug!(
            "Spawned extractor {} (pid {:?}) for {}",
            self.program,
            child.id(),
            file.display()
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Dropping this future on timeout drops the child, which kills it.
        let supervise = async move {
            let (status, out, err) =
                tokio::try_join!(child.wait(), drain(stdout), drain(stderr))?;
            Ok::<_, std::io::Error>(ProcessCapture {
                stdout: String::from_utf8_lossy(&out).into_owned(),
                stderr: String::from_utf8_lossy(&err).into_owned(),
                exit_code: status.code(),
            })
        };

        match tokio::time::timeout(self.timeout, supervise).await {
            Ok(Ok(capture)) => {
                tracing::debug!(
                    "Extractor exited with {:?} ({} stdout bytes, {} stderr bytes)",
                    capture.exit_code,
                    capture.stdout.len(),
                    capture.stderr.len()
                );
                Ok(capture)
            }
            Ok(Err(e)) => Err(InvokeError::Io(e)),
            Err(_) => {
                tracing::warn!(
                    "Extractor {} exceeded {:?} on {}, killed",
                    self.program,
                    self.timeout,
                    file.display()
                );
                Err(InvokeError::Timeout(self.timeout))
            }
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
