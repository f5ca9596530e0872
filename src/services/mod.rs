//! Service layer for the downloader.
//!
//! This module contains the business logic for:
//! - Catalog search and lookup (`CatalogClient`)
//! - Result row parsing (`CandidateExtractor`)
//! - Vote-based ranking (`rank`)
//! - Candidate selection (`Selector`)
//! - Archive download (`Fetcher`)
//! - Playlist resolution (`PlaylistProvider`)

mod catalog;
mod extractor;
mod fetcher;
mod playlist;
mod ranker;
mod selector;

pub use catalog::CatalogClient;
pub use extractor::{CandidateExtractor, short_difficulty};
pub use fetcher::Fetcher;
pub use playlist::{PlaylistProvider, SpotifyPlaylist, playlist_id};
pub use ranker::{compare_score, rank};
pub use selector::{Prompt, Selector, StdinPrompt};
