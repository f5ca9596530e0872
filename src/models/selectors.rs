// src/models/selectors.rs

//! CSS selectors for scraping catalog result markup.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors for scraping search results and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSelectors {
    /// Selector for each result row in the search page
    #[serde(default = "defaults::row")]
    pub row: String,

    /// Any match inside a row marks it as an ad/widget/footer block
    #[serde(default = "defaults::sentinel")]
    pub sentinel: String,

    /// Selector for the row header holding the title
    #[serde(default = "defaults::header")]
    pub header: String,

    /// Selector for the detail link inside the header
    #[serde(default = "defaults::header_link")]
    pub header_link: String,

    /// Regex with one capture group reading the code from the detail link
    #[serde(default = "defaults::code_pattern")]
    pub code_pattern: String,

    /// Selector for the numeric stat labels (first one is skipped)
    #[serde(default = "defaults::stat")]
    pub stat: String,

    /// Selector for difficulty labels
    #[serde(default = "defaults::difficulty")]
    pub difficulty: String,

    /// Selector for the mapper metadata block
    #[serde(default = "defaults::mapper")]
    pub mapper: String,

    /// Selector for the mapper's profile link inside the mapper block
    #[serde(default = "defaults::mapper_link")]
    pub mapper_link: String,

    /// Selector for the element carrying the publication timestamp
    #[serde(default = "defaults::time")]
    pub time: String,

    /// Attribute holding the machine-readable timestamp
    #[serde(default = "defaults::time_attr")]
    pub time_attr: String,

    /// Selector for the download link
    #[serde(default = "defaults::download")]
    pub download: String,

    /// Selector for the title on a detail page
    #[serde(default = "defaults::detail_title")]
    pub detail_title: String,
}

impl Default for ResultSelectors {
    fn default() -> Self {
        Self {
            row: defaults::row(),
            sentinel: defaults::sentinel(),
            header: defaults::header(),
            header_link: defaults::header_link(),
            code_pattern: defaults::code_pattern(),
            stat: defaults::stat(),
            difficulty: defaults::difficulty(),
            mapper: defaults::mapper(),
            mapper_link: defaults::mapper_link(),
            time: defaults::time(),
            time_attr: defaults::time_attr(),
            download: defaults::download(),
            detail_title: defaults::detail_title(),
        }
    }
}

impl ResultSelectors {
    /// Check that every selector and the code pattern compile.
    pub fn validate(&self) -> Result<()> {
        for selector in [
            &self.row,
            &self.sentinel,
            &self.header,
            &self.header_link,
            &self.stat,
            &self.difficulty,
            &self.mapper,
            &self.mapper_link,
            &self.time,
            &self.download,
            &self.detail_title,
        ] {
            parse_selector(selector)?;
        }
        let pattern = regex::Regex::new(&self.code_pattern)
            .map_err(|e| AppError::validation(format!("selectors.code_pattern: {e}")))?;
        if pattern.captures_len() < 2 {
            return Err(AppError::validation(
                "selectors.code_pattern needs a capture group",
            ));
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

mod defaults {
    pub fn row() -> String {
        "div.row".into()
    }
    pub fn sentinel() -> String {
        "div.widget, div.small-2, div.subfooter-menu-holder".into()
    }
    pub fn header() -> String {
        "header".into()
    }
    pub fn header_link() -> String {
        "a[href]".into()
    }
    pub fn code_pattern() -> String {
        r"songs/(\w+)/".into()
    }
    pub fn stat() -> String {
        "span.post-stat".into()
    }
    pub fn difficulty() -> String {
        "a.post-difficulty".into()
    }
    pub fn mapper() -> String {
        "div.post-bottom-meta.post-mapper-id-meta".into()
    }
    pub fn mapper_link() -> String {
        "a".into()
    }
    pub fn time() -> String {
        "time".into()
    }
    pub fn time_attr() -> String {
        "content".into()
    }
    pub fn download() -> String {
        "a.-download-zip".into()
    }
    pub fn detail_title() -> String {
        "header.post-title h1".into()
    }
}
