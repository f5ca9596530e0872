//! Selection modes and per-query outcomes.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::Candidate;

/// How a candidate is picked from a ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Pick the top-ranked candidate and download it
    #[default]
    Auto,
    /// Ask the operator for every query
    List,
    /// Pick like `auto` but never touch the network or filesystem for downloads
    Test,
}

impl Mode {
    /// Whether this mode performs no downloads or file writes.
    pub fn is_dry_run(self) -> bool {
        self == Mode::Test
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Auto => "auto",
            Mode::List => "list",
            Mode::Test => "test",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Mode::Auto),
            "list" => Ok(Mode::List),
            "test" => Ok(Mode::Test),
            other => Err(AppError::validation(format!(
                "unknown mode '{other}' (expected auto, list or test)"
            ))),
        }
    }
}

/// Result of running the selector over a ranked list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(Candidate),
    Skipped,
    NotFound,
}

/// Why a chosen candidate was not downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The catalog offers no download link
    NoLink,
}

/// Result of handing a chosen candidate to the fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded,
    AlreadyPresent,
    Skipped(SkipReason),
    /// Dry run: matched but nothing fetched
    MatchedOnly,
}

impl FetchOutcome {
    /// Whether the artifact is (or already was) on disk.
    pub fn is_stored(self) -> bool {
        matches!(self, FetchOutcome::Downloaded | FetchOutcome::AlreadyPresent)
    }
}

/// Per-outcome counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub matched: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl BatchStats {
    /// Count a fetch outcome.
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::AlreadyPresent => self.already_present += 1,
            FetchOutcome::MatchedOnly => self.matched += 1,
            FetchOutcome::Skipped(_) => self.failed += 1,
        }
    }
}

/// A playlist entry as returned by a playlist provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("auto".parse::<Mode>().unwrap(), Mode::Auto);
        assert_eq!(" LIST\n".parse::<Mode>().unwrap(), Mode::List);
        assert_eq!("Test".parse::<Mode>().unwrap(), Mode::Test);
        assert!(matches!("fast".parse::<Mode>(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_mode_display_and_dry_run() {
        assert_eq!(Mode::Auto.to_string(), "auto");
        assert_eq!(Mode::List.to_string(), "list");
        assert!(Mode::Test.is_dry_run());
        assert!(!Mode::Auto.is_dry_run());
        assert_eq!(Mode::default(), Mode::Auto);
    }

    #[test]
    fn test_outcome_is_stored() {
        assert!(FetchOutcome::Downloaded.is_stored());
        assert!(FetchOutcome::AlreadyPresent.is_stored());
        assert!(!FetchOutcome::MatchedOnly.is_stored());
        assert!(!FetchOutcome::Skipped(SkipReason::NoLink).is_stored());
    }

    #[test]
    fn test_stats_record() {
        let mut stats = BatchStats::default();
        stats.record(FetchOutcome::Downloaded);
        stats.record(FetchOutcome::AlreadyPresent);
        stats.record(FetchOutcome::Skipped(SkipReason::NoLink));
        stats.record(FetchOutcome::MatchedOnly);
        assert_eq!(stats.downloaded, 1);
        assert_eq!(stats.already_present, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.matched, 1);
    }
}
