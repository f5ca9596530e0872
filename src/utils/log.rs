// src/utils/log.rs

//! Run reporting with server-style formatting.
//!
//! The batch pipeline emits one [`Event`] per step to a [`Reporter`] passed
//! in by the caller. [`ConsoleReporter`] prints them as timestamped lines.

use chrono::Local;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::error::AppError;
use crate::models::{BatchStats, Candidate, FetchOutcome, Mode, Query, SkipReason};
use crate::utils::text::wrap_graphemes;

/// Titles wider than this are wrapped in the candidate table.
const TITLE_WIDTH: usize = 45;

/// One observable step of a batch run.
#[derive(Debug)]
pub enum Event<'a> {
    BatchStarted { total: usize, mode: Mode },
    QueryStarted { index: usize, total: usize, query: &'a Query },
    Searched { query: &'a Query, found: usize },
    LookedUp { query: &'a Query, code: &'a str },
    LookupFailed { query: &'a Query, error: &'a AppError },
    Candidates(&'a [Candidate]),
    InvalidChoice { input: &'a str },
    NotFound { query: &'a Query },
    Skipped { query: &'a Query },
    Fetched { candidate: &'a Candidate, outcome: FetchOutcome },
    FetchFailed { candidate: &'a Candidate, error: &'a AppError },
    Finished(&'a BatchStats),
}

/// Observer for batch progress.
pub trait Reporter {
    fn report(&self, event: &Event<'_>);
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Format a log message with timestamp and level
fn format_log(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, level.as_str(), message)
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Song")]
    title: String,
    #[tabled(rename = "Mapper")]
    uploader: String,
    #[tabled(rename = "Up")]
    upvotes: u64,
    #[tabled(rename = "Down")]
    downvotes: u64,
    #[tabled(rename = "Difficulty")]
    difficulties: String,
    #[tabled(rename = "Date")]
    date: String,
}

/// Render candidates as a numbered table (numbering starts at 1).
pub fn candidate_table(candidates: &[Candidate]) -> String {
    let rows: Vec<CandidateRow> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| CandidateRow {
            index: i + 1,
            code: c.code.clone(),
            title: wrap_graphemes(&c.title, TITLE_WIDTH),
            uploader: c.uploader.clone(),
            upvotes: c.upvotes,
            downvotes: c.downvotes,
            difficulties: c.difficulties.join(", "),
            date: c
                .published_at
                .map(|d| d.format("%d.%m.%Y").to_string())
                .unwrap_or_default(),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// Reporter printing timestamped status lines to the terminal.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress INFO lines; warnings, errors and tables still print.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn line(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug | LogLevel::Info if self.quiet => {}
            LogLevel::Debug | LogLevel::Info => println!("{}", format_log(level, message)),
            LogLevel::Warn | LogLevel::Error => eprintln!("{}", format_log(level, message)),
        }
    }

    fn header(&self, title: &str) {
        let border = "═".repeat(60);
        self.line(LogLevel::Info, &border);
        self.line(LogLevel::Info, &format!("  {}", title));
        self.line(LogLevel::Info, &border);
    }

    fn sub_item(&self, message: &str) {
        self.line(LogLevel::Info, &format!("    {}", message));
    }

    fn summary(&self, stats: &BatchStats) {
        self.line(LogLevel::Info, "[SUMMARY] Batch complete");
        let items = [
            ("Queries", stats.total),
            ("Downloaded", stats.downloaded),
            ("Already downloaded", stats.already_present),
            ("Matched (test)", stats.matched),
            ("Skipped", stats.skipped),
            ("Not found", stats.not_found),
            ("Failed", stats.failed),
        ];
        for (key, value) in items {
            self.sub_item(&format!("{key}: {value}"));
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &Event<'_>) {
        match event {
            Event::BatchStarted { total, mode } => {
                self.header(&format!("saberdl: {total} song(s), mode {mode}"));
            }
            Event::QueryStarted { index, total, query } => {
                self.line(
                    LogLevel::Info,
                    &format!("[{}/{}] Searching for {}", index, total, query.label()),
                );
            }
            Event::Searched { query, found } => {
                self.sub_item(&format!("Searched for {}: {} result(s)", query.label(), found));
            }
            Event::LookedUp { query, code } => {
                self.sub_item(&format!("Searched for {} [{}]", query.label(), code));
            }
            Event::LookupFailed { query, error } => {
                self.line(
                    LogLevel::Error,
                    &format!("Lookup failed for {}: {}", query.label(), error),
                );
            }
            Event::Candidates(candidates) => {
                println!("{}", candidate_table(candidates));
            }
            Event::InvalidChoice { input } => {
                self.line(LogLevel::Warn, &format!("Wrong! '{}' is not a listed number", input.trim()));
            }
            Event::NotFound { query } => {
                self.line(LogLevel::Warn, &format!("No song found for {}", query.label()));
            }
            Event::Skipped { query } => {
                self.line(LogLevel::Info, &format!("Skipped {}", query.label()));
            }
            Event::Fetched { candidate, outcome } => {
                let (level, verb) = match outcome {
                    FetchOutcome::Downloaded => (LogLevel::Info, "Downloaded"),
                    FetchOutcome::AlreadyPresent => (LogLevel::Info, "Already downloaded"),
                    FetchOutcome::MatchedOnly => (LogLevel::Info, "Matched with"),
                    FetchOutcome::Skipped(SkipReason::NoLink) => {
                        (LogLevel::Warn, "No link working for")
                    }
                };
                self.line(level, &format!("{} {} #{}", verb, candidate.title, candidate.code));
            }
            Event::FetchFailed { candidate, error } => {
                self.line(
                    LogLevel::Error,
                    &format!("Download failed for {}: {}", candidate.title, error),
                );
            }
            Event::Finished(stats) => self.summary(stats),
        }
    }
}
