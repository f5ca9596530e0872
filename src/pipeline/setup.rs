// src/pipeline/setup.rs

//! Run parameters and credential setup, asked interactively when missing.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Config, Mode};
use crate::services::{Prompt, playlist_id};

const SPOTIFY_DASHBOARD: &str = "https://developer.spotify.com/dashboard/applications";

/// Where the queries of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Song(String),
    File(PathBuf),
    Playlist(String),
}

/// Fully resolved parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub source: Source,
    pub name: Option<String>,
    pub mode: Mode,
}

/// Fill in parameters missing from the command line.
///
/// With a prompt, a missing source becomes a playlist link question (asked
/// again until the link is valid), a missing name is asked (blank means no
/// batch folder) and a missing mode is asked until it is `auto`, `list` or
/// `test`. Without one, a source is required and the rest use defaults.
pub fn resolve_params(
    source: Option<Source>,
    name: Option<String>,
    mode: Option<Mode>,
    prompt: Option<&mut dyn Prompt>,
) -> Result<RunParams> {
    let Some(prompt) = prompt else {
        let source = source.ok_or_else(|| {
            AppError::validation("one of --song, --file or --playlist is required")
        })?;
        return Ok(RunParams {
            source,
            name,
            mode: mode.unwrap_or_default(),
        });
    };

    let source = match source {
        Some(source) => source,
        None => Source::Playlist(ask_playlist(prompt)?),
    };

    let name = match name {
        Some(name) => Some(name),
        None => {
            let answer = ask(prompt, "> Choose a name for the playlist: ")?;
            Some(answer).filter(|a| !a.is_empty())
        }
    };

    let mode = match mode {
        Some(mode) => mode,
        None => ask_mode(prompt)?,
    };

    Ok(RunParams { source, name, mode })
}

fn ask_playlist(prompt: &mut dyn Prompt) -> Result<String> {
    let mut message = "> Spotify playlist link: ";
    loop {
        let answer = ask(prompt, message)?;
        if playlist_id(&answer).is_ok() {
            return Ok(answer);
        }
        message = "Bad link! Retry: ";
    }
}

fn ask_mode(prompt: &mut dyn Prompt) -> Result<Mode> {
    loop {
        if let Ok(mode) = ask(prompt, "> Choose mode [auto|list|test]: ")?.parse() {
            return Ok(mode);
        }
    }
}

/// Ask once and trim the answer; closed input is an error.
fn ask(prompt: &mut dyn Prompt, message: &str) -> Result<String> {
    prompt
        .ask(message)?
        .map(|answer| answer.trim().to_string())
        .ok_or_else(|| AppError::validation("input closed before all parameters were given"))
}

/// Ask for Spotify credentials and store them in the `[spotify]` table of `path`.
///
/// Other settings already in the file are kept. Returns the saved configuration.
pub fn configure_spotify(path: &Path, prompt: &mut dyn Prompt) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        Config::default()
    };

    println!("To get a key, go to {SPOTIFY_DASHBOARD} and create a new application.");
    let client_id = ask_required(prompt, "Client ID: ")?;
    let client_secret = ask_required(prompt, "Client secret: ")?;

    config.spotify.client_id = Some(client_id);
    config.spotify.client_secret = Some(client_secret);
    config.save(path)?;
    log::info!("Spotify credentials saved to {}", path.display());

    Ok(config)
}

fn ask_required(prompt: &mut dyn Prompt, message: &str) -> Result<String> {
    loop {
        let answer = ask(prompt, message)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
    }
}
