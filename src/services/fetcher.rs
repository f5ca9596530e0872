// src/services/fetcher.rs

//! Artifact fetcher.
//!
//! Downloads are idempotent: an existing destination file is never fetched
//! again, and bodies are streamed to a `.part` sibling that is renamed only
//! once complete, so a file under its final name is always a whole archive.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Candidate, FetchOutcome, Mode, SkipReason};
use crate::utils::http::Transport;

/// Downloads chosen candidates to disk.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    mode: Mode,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, mode: Mode) -> Self {
        Self { transport, mode }
    }

    /// Download `candidate` to `destination` unless there is nothing to do.
    pub async fn fetch(&self, candidate: &Candidate, destination: &Path) -> Result<FetchOutcome> {
        if self.mode.is_dry_run() {
            return Ok(FetchOutcome::MatchedOnly);
        }

        if tokio::fs::try_exists(destination).await? {
            log::debug!("{} already exists", destination.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let Some(url) = candidate.download_url.as_deref() else {
            return Ok(FetchOutcome::Skipped(SkipReason::NoLink));
        };

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let partial = partial_path(destination);
        match self.transport.download_to(url, &partial).await {
            Ok(bytes) => {
                tokio::fs::rename(&partial, destination).await?;
                log::debug!("Wrote {} bytes to {}", bytes, destination.display());
                Ok(FetchOutcome::Downloaded)
            }
            Err(error) => {
                if let Err(e) = tokio::fs::remove_file(&partial).await {
                    log::debug!("No partial file to clean up at {}: {}", partial.display(), e);
                }
                Err(error)
            }
        }
    }
}

/// `<destination>.part`, the in-progress download path.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("download"));
    name.push(".part");
    destination.with_file_name(name)
}
