//! In-memory fakes for the pipeline's capabilities.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::services::Prompt;
use crate::utils::http::Transport;
use crate::utils::log::{Event, Reporter};

/// Transport serving canned pages and archives, recording every URL.
#[derive(Default)]
pub struct FakeTransport {
    pages: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn with_file(mut self, url: impl Into<String>, bytes: &[u8]) -> Self {
        self.files.insert(url.into(), bytes.to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }
}

fn not_found(url: &str) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no fake response for {url}"),
    ))
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.record(url);
        self.pages.get(url).cloned().ok_or_else(|| not_found(url))
    }

    async fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        self.record(url);
        let bytes = self.files.get(url).ok_or_else(|| not_found(url))?;
        std::fs::write(path, bytes)?;
        Ok(bytes.len() as u64)
    }
}

/// Prompt answering from a fixed script; `None` once exhausted.
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        self.asked.push(message.to_string());
        Ok(self.answers.pop_front())
    }
}

/// Reporter keeping a one-line digest of every event.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &Event<'_>) {
        let digest = match event {
            Event::BatchStarted { total, mode } => format!("start {total} {mode}"),
            Event::QueryStarted { query, .. } => format!("query {}", query.label()),
            Event::Searched { found, .. } => format!("searched {found}"),
            Event::LookedUp { code, .. } => format!("lookup {code}"),
            Event::LookupFailed { .. } => "lookup-failed".to_string(),
            Event::Candidates(list) => format!("candidates {}", list.len()),
            Event::InvalidChoice { input } => format!("invalid {input}"),
            Event::NotFound { .. } => "not-found".to_string(),
            Event::Skipped { .. } => "skipped".to_string(),
            Event::Fetched { candidate, outcome } => {
                format!("fetched {} {:?}", candidate.code, outcome)
            }
            Event::FetchFailed { candidate, .. } => format!("fetch-failed {}", candidate.code),
            Event::Finished(_) => "finished".to_string(),
        };
        self.events.lock().unwrap().push(digest);
    }
}
