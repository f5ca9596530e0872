//! Pipeline entry points for download batches.
//!
//! - `Batch`: search, rank, select and fetch one song per query
//! - `queries_from_file` / `queries_from_playlist`: build the query list
//! - `resolve_params` / `configure_spotify`: interactive run and credential setup

mod batch;
mod setup;
mod source;

pub use batch::Batch;
pub use setup::{RunParams, Source, configure_spotify, resolve_params};
pub use source::{queries_from_file, queries_from_playlist};
