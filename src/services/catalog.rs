// src/services/catalog.rs

//! Catalog client: full-text search and by-code lookup.

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Candidate, CatalogConfig, Config, parse_selector};
use crate::utils::http::Transport;
use crate::utils::text::{collapse_whitespace, encode_query};

/// Issues search and detail requests against the catalog.
pub struct CatalogClient {
    transport: Arc<dyn Transport>,
    catalog: CatalogConfig,
    row: Selector,
    detail_title: Selector,
}

impl CatalogClient {
    /// Create a client with the configured endpoints and selectors.
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            transport,
            catalog: config.catalog.clone(),
            row: parse_selector(&config.selectors.row)?,
            detail_title: parse_selector(&config.selectors.detail_title)?,
        })
    }

    /// Relevance-ordered search, returning raw result rows in document order.
    ///
    /// Network failures are logged and treated as "no results".
    pub async fn search(&self, query_text: &str) -> Vec<String> {
        let url = self.catalog.search_url(&encode_query(query_text));

        match self.transport.get_text(&url).await {
            Ok(body) => self.split_rows(&body),
            Err(error) => {
                log::warn!("Search for '{}' failed: {}", query_text, error);
                Vec::new()
            }
        }
    }

    /// Look up one catalog entry by its exact code.
    pub async fn fetch_by_code(&self, code: &str) -> Result<Candidate> {
        let url = self.catalog.detail_url(code);
        let body = self
            .transport
            .get_text(&url)
            .await
            .map_err(|e| AppError::lookup(code, e))?;

        let title = self
            .detail_title(&body)
            .ok_or_else(|| AppError::lookup(code, "detail page has no title"))?;

        Ok(Candidate::from_lookup(
            code,
            title,
            self.catalog.download_url(code),
        ))
    }

    fn split_rows(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);
        document.select(&self.row).map(|row| row.html()).collect()
    }

    fn detail_title(&self, body: &str) -> Option<String> {
        let document = Html::parse_document(body);
        let title = document
            .select(&self.detail_title)
            .next()
            .map(|h| collapse_whitespace(&h.text().collect::<String>()))?;
        (!title.is_empty()).then_some(title)
    }
}
