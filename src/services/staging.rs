use crate::utils::validation::{sanitize_filename, staged_extension};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes decoded uploads under a dedicated staging directory.
///
/// Staged paths are `<dir>/<uuid>[.<ext>]`; the client-supplied name only
/// contributes a sanitized extension.
#[derive(Debug, Clone)]
pub struct UploadStager {
    dir: PathBuf,
    retain: bool,
}

/// A document written to disk for the lifetime of one request.
///
/// The file is removed when this value is dropped unless the stager was
/// configured to retain staged files.
#[derive(Debug)]
pub struct StagedFile {
    pub id: Uuid,
    pub display_name: String,
    pub size: usize,
    path: PathBuf,
    retain: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("invalid file name: {0}")]
    InvalidName(#[from] crate::utils::validation::ValidationError),

    #[error("staging I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadStager {
    pub fn new(dir: impl Into<PathBuf>, retain: bool) -> Self {
        Self {
            dir: dir.into(),
            retain,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `bytes` and return the owning handle.
    pub async fn stage(&self, file_name: &str, bytes: &[u8]) -> Result<StagedFile, StageError> {
        let display_name = sanitize_filename(file_name)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let id = Uuid::new_v4();
        let stored_name = match staged_extension(&display_name) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        };
        let path = self.dir.join(stored_name);

        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(
            "Staged '{}' ({} bytes) at {}",
            display_name,
            bytes.len(),
            path.display()
        );

        Ok(StagedFile {
            id,
            display_name,
            size: bytes.len(),
            path,
            retain: self.retain,
        })
    }
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.retain {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed staged file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove staged file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
