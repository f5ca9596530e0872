//! Candidate data structure.

use chrono::NaiveDate;

use crate::utils::text::sanitize_filename;

/// A catalog entry found by search or direct lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Stable catalog identifier
    pub code: String,

    /// Display title
    pub title: String,

    /// Archive URL; `None` when the entry is currently undownloadable
    pub download_url: Option<String>,

    /// Short difficulty labels in page order
    pub difficulties: Vec<String>,

    pub upvotes: u64,

    pub downvotes: u64,

    /// Mapper handle
    pub uploader: String,

    /// Publication date (absent for direct lookups)
    pub published_at: Option<NaiveDate>,
}

impl Candidate {
    /// Minimal candidate built from a detail page.
    pub fn from_lookup(
        code: impl Into<String>,
        title: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            download_url: Some(download_url.into()),
            difficulties: Vec::new(),
            upvotes: 0,
            downvotes: 0,
            uploader: String::new(),
            published_at: None,
        }
    }

    /// File name of the downloaded archive.
    pub fn artifact_file_name(&self) -> String {
        format!("{}.zip", sanitize_filename(&self.title))
    }

    /// Run log line for this candidate.
    pub fn log_line(&self) -> String {
        format!("{} #{}", self.title, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_defaults() {
        let c = Candidate::from_lookup("XYZ99", "Angel Voices", "https://dl/XYZ99");
        assert_eq!(c.upvotes, 0);
        assert_eq!(c.downvotes, 0);
        assert!(c.difficulties.is_empty());
        assert!(c.published_at.is_none());
        assert_eq!(c.download_url.as_deref(), Some("https://dl/XYZ99"));
    }

    #[test]
    fn test_artifact_file_name() {
        let c = Candidate::from_lookup("a1", "AC/DC – Thunderstruck", "x");
        assert_eq!(c.artifact_file_name(), "AC_DC_Thunderstruck.zip");
        assert_eq!(c.log_line(), "AC/DC – Thunderstruck #a1");
    }
}
