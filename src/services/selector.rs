// src/services/selector.rs

//! Candidate selection.
//!
//! Resolves a ranked list to a [`Selection`]: `auto` and `test` take the top
//! entry, `list` asks the operator through a [`Prompt`] until the answer is a
//! number in `0..=len` (`0` skips).

use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::models::{Candidate, Mode, Selection};
use crate::utils::log::{Event, Reporter};

/// Source of operator answers.
pub trait Prompt {
    /// Show `message` and read one answer; `None` once input is exhausted.
    fn ask(&mut self, message: &str) -> Result<Option<String>>;
}

/// Prompt reading lines from standard input.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        print!("{message}");
        io::stdout().flush()?;

        Ok(read_answer(&mut io::stdin().lock())?)
    }
}

/// Read one line off the runtime's worker; `None` at end of input.
fn read_answer(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = tokio::task::block_in_place(|| reader.read_line(&mut line))?;
    Ok((read > 0).then_some(line))
}

/// Picks one candidate per query.
pub struct Selector {
    mode: Mode,
    prompt: Box<dyn Prompt>,
}

impl Selector {
    pub fn new(mode: Mode, prompt: Box<dyn Prompt>) -> Self {
        Self { mode, prompt }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Resolve a ranked list to a selection.
    pub fn select(&mut self, ranked: Vec<Candidate>, reporter: &dyn Reporter) -> Result<Selection> {
        if ranked.is_empty() {
            return Ok(Selection::NotFound);
        }

        let index = match self.mode {
            Mode::Auto | Mode::Test => 1,
            Mode::List => {
                reporter.report(&Event::Candidates(&ranked));
                match self.ask_index(ranked.len(), reporter)? {
                    Some(index) => index,
                    None => return Ok(Selection::Skipped),
                }
            }
        };

        if index == 0 {
            return Ok(Selection::Skipped);
        }
        Ok(ranked
            .into_iter()
            .nth(index - 1)
            .map_or(Selection::Skipped, Selection::Chosen))
    }

    /// Ask until the answer is in `0..=len`; `None` on end of input.
    fn ask_index(&mut self, len: usize, reporter: &dyn Reporter) -> Result<Option<usize>> {
        let mut message = format!("> Choose a song [1-{len}, 0: skip]: ");
        loop {
            let Some(answer) = self.prompt.ask(&message)? else {
                return Ok(None);
            };
            match parse_choice(&answer) {
                Some(index) if index <= len => return Ok(Some(index)),
                _ => {
                    reporter.report(&Event::InvalidChoice { input: &answer });
                    message = format!("Wrong! > Retry [1-{len}, 0: skip]: ");
                }
            }
        }
    }
}

/// A plain decimal number; signs and other characters are rejected.
fn parse_choice(answer: &str) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    answer.parse().ok()
}
