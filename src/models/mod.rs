// src/models/mod.rs

//! Domain models for the downloader.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod candidate;
mod config;
mod outcome;
mod query;
mod selectors;

// Re-export all public types
pub use candidate::Candidate;
pub use config::{CatalogConfig, Config, SpotifyConfig};
pub use outcome::{BatchStats, FetchOutcome, Mode, Selection, SkipReason, Track};
pub use query::Query;
pub use selectors::{ResultSelectors, parse_selector};
