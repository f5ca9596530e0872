//! Append-only run log.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::Candidate;

/// Flat text log with one `<title> #<code>` line per processed artifact.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file on first write.
    pub async fn append(&self, candidate: &Candidate) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", candidate.log_line()).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_creates_and_appends() {
        let tmp = TempDir::new().unwrap();
        let log = RunLog::new(tmp.path().join("batch.log"));
        assert!(!log.path().exists());

        log.append(&Candidate::from_lookup("XYZ99", "Angel Voices", "x"))
            .await
            .unwrap();
        log.append(&Candidate::from_lookup("ab12", "One More Time", "x"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "Angel Voices #XYZ99\nOne More Time #ab12\n");
    }
}
