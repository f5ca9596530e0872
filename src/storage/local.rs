//! Local filesystem destination for downloaded archives.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Candidate;
use crate::storage::RunLog;

const DEFAULT_LOG_NAME: &str = "saberdl";

/// Destination root plus optional batch sub-folder.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    batch: Option<String>,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, batch: Option<String>) -> Self {
        let batch = batch
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        Self {
            root_dir: root_dir.into(),
            batch,
        }
    }

    /// Folder the batch's archives are written to.
    pub fn batch_dir(&self) -> PathBuf {
        match &self.batch {
            Some(name) => self.root_dir.join(name),
            None => self.root_dir.clone(),
        }
    }

    /// Final path of a candidate's archive.
    pub fn artifact_path(&self, candidate: &Candidate) -> PathBuf {
        self.batch_dir().join(candidate.artifact_file_name())
    }

    /// Run log for this batch.
    pub fn run_log(&self) -> RunLog {
        let name = self.batch.as_deref().unwrap_or(DEFAULT_LOG_NAME);
        RunLog::new(self.root_dir.join(format!("{name}.log")))
    }

    /// Check the root is an existing, writable directory.
    pub async fn check_root(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.root_dir)
            .await
            .map_err(|e| AppError::filesystem(&self.root_dir, e))?;

        if !metadata.is_dir() {
            return Err(AppError::filesystem(&self.root_dir, "not a directory"));
        }
        if metadata.permissions().readonly() {
            return Err(AppError::filesystem(&self.root_dir, "directory is read-only"));
        }
        self.check_writable().await
    }

    /// Create and remove a scratch file in the root.
    async fn check_writable(&self) -> Result<()> {
        let scratch = self
            .root_dir
            .join(format!(".{DEFAULT_LOG_NAME}-write-check-{}", std::process::id()));
        tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&scratch)
            .await
            .map_err(|e| AppError::filesystem(&self.root_dir, format!("not writable: {e}")))?;
        tokio::fs::remove_file(&scratch)
            .await
            .map_err(|e| AppError::filesystem(&scratch, e))
    }

    /// Validate the root and, unless this is a dry run, create the batch folder.
    pub async fn prepare(&self, dry_run: bool) -> Result<()> {
        self.check_root().await?;
        if !dry_run {
            let dir = self.batch_dir();
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| AppError::filesystem(&dir, e))?;
        }
        Ok(())
    }
}
