// src/utils/http.rs

//! HTTP transport used by the catalog client and fetcher.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::CatalogConfig;

/// The two network interactions the pipeline needs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// GET `url` and stream the body into a new file at `path`.
    ///
    /// Returns the number of bytes written.
    async fn download_to(&self, url: &str, path: &Path) -> Result<u64>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CatalogConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }

    /// Underlying client, shared with the playlist provider.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {url}");
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    async fn download_to(&self, url: &str, path: &Path) -> Result<u64> {
        log::debug!("GET {url} -> {}", path.display());
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}
