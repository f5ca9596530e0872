// src/pipeline/source.rs

//! Query sources: a query file or a playlist.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Query;
use crate::services::PlaylistProvider;

/// Read a newline-delimited query file, ignoring blank lines.
pub async fn queries_from_file(path: &Path) -> Result<Vec<Query>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::filesystem(path, e))?;
    Ok(parse_queries(&content))
}

fn parse_queries(content: &str) -> Vec<Query> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(Query::normalize)
        .collect()
}

/// Resolve a playlist to one query per track, in playlist order.
pub async fn queries_from_playlist(
    provider: &dyn PlaylistProvider,
    reference: &str,
) -> Result<Vec<Query>> {
    let tracks = provider.tracks(reference).await?;
    Ok(tracks.iter().map(Query::from_track).collect())
}
