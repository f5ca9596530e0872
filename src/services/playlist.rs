// src/services/playlist.rs

//! Playlist providers seeding the query list.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{SpotifyConfig, Track};

/// Resolves a playlist reference to its tracks, in playlist order.
#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    async fn tracks(&self, reference: &str) -> Result<Vec<Track>>;
}

/// Spotify Web API provider using the client credentials flow.
pub struct SpotifyPlaylist {
    client: reqwest::Client,
    config: SpotifyConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

impl SpotifyPlaylist {
    pub fn new(client: reqwest::Client, config: SpotifyConfig) -> Self {
        Self { client, config }
    }

    /// Exchange the configured credentials for a bearer token.
    pub async fn access_token(&self) -> Result<String> {
        let (Some(id), Some(secret)) = (&self.config.client_id, &self.config.client_secret) else {
            return Err(AppError::config(
                "spotify.client_id and spotify.client_secret are required for playlists",
            ));
        };

        let request = self
            .client
            .post(&self.config.token_url)
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")]);
        let response: TokenResponse = fetch_json(request).await?;
        Ok(response.access_token)
    }
}

#[async_trait]
impl PlaylistProvider for SpotifyPlaylist {
    async fn tracks(&self, reference: &str) -> Result<Vec<Track>> {
        let id = playlist_id(reference)?;
        let token = self.access_token().await?;

        let mut tracks = Vec::new();
        let mut next = Some(format!(
            "{}/playlists/{}/tracks?limit=100",
            self.config.api_base_url.trim_end_matches('/'),
            id
        ));

        while let Some(url) = next {
            log::debug!("GET {url}");
            let page: TracksPage = fetch_json(self.client.get(&url).bearer_auth(&token)).await?;

            tracks.extend(page.items.into_iter().filter_map(to_track));
            next = page.next;
        }

        log::info!("Playlist {} has {} track(s)", id, tracks.len());
        Ok(tracks)
    }
}

async fn fetch_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let body = request.send().await?.error_for_status()?.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn to_track(item: PlaylistItem) -> Option<Track> {
    let track = item.track?;
    let artist = track
        .artists
        .into_iter()
        .next()
        .map(|a| a.name)
        .unwrap_or_default();
    Some(Track {
        title: track.name,
        artist,
    })
}

/// Extract the playlist id from a share link, URI or bare id.
pub fn playlist_id(reference: &str) -> Result<String> {
    let reference = reference.trim();
    let is_id = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());

    let candidate = if let Some(rest) = reference.strip_prefix("spotify:playlist:") {
        rest.to_string()
    } else if reference.starts_with("http://") || reference.starts_with("https://") {
        let url = url::Url::parse(reference)?;
        let mut segments = url.path_segments().into_iter().flatten();
        let found = url.host_str() == Some("open.spotify.com")
            && segments.by_ref().any(|s| s == "playlist");
        match segments.next() {
            Some(id) if found => id.to_string(),
            _ => String::new(),
        }
    } else {
        reference.to_string()
    };

    if is_id(&candidate) {
        Ok(candidate)
    } else {
        Err(AppError::playlist(format!("not a Spotify playlist: '{reference}'")))
    }
}
