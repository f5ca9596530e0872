// src/services/extractor.rs

//! Candidate extraction from search result markup.
//!
//! Pure parsing: one raw result fragment in, one [`Candidate`] (or nothing)
//! out. Rows carrying the sentinel class are ads, widgets or footers and
//! are not results. A row that is a result but lacks a required field means
//! the catalog changed its markup, which is reported as [`AppError::Schema`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Candidate, Config, parse_selector};
use crate::utils::resolve_url;
use crate::utils::text::collapse_whitespace;

/// Compiled selectors for parsing one result row.
pub struct CandidateExtractor {
    sentinel: Selector,
    header: Selector,
    header_link: Selector,
    stat: Selector,
    difficulty: Selector,
    mapper: Selector,
    mapper_link: Selector,
    time: Selector,
    time_attr: String,
    download: Selector,
    code_pattern: Regex,
    mapper_after_newline: Regex,
    word: Regex,
    base_url: Option<Url>,
}

impl CandidateExtractor {
    /// Compile the configured selectors.
    pub fn new(config: &Config) -> Result<Self> {
        let s = &config.selectors;
        let regex = |pattern: &str| {
            Regex::new(pattern).map_err(|e| AppError::validation(format!("{pattern}: {e}")))
        };

        Ok(Self {
            sentinel: parse_selector(&s.sentinel)?,
            header: parse_selector(&s.header)?,
            header_link: parse_selector(&s.header_link)?,
            stat: parse_selector(&s.stat)?,
            difficulty: parse_selector(&s.difficulty)?,
            mapper: parse_selector(&s.mapper)?,
            mapper_link: parse_selector(&s.mapper_link)?,
            time: parse_selector(&s.time)?,
            time_attr: s.time_attr.clone(),
            download: parse_selector(&s.download)?,
            code_pattern: regex(&s.code_pattern)?,
            mapper_after_newline: regex(r"\n+(\w+)")?,
            word: regex(r"(\w+)")?,
            base_url: Url::parse(&config.catalog.base_url).ok(),
        })
    }

    /// Parse one raw result fragment.
    pub fn extract(&self, fragment: &str) -> Result<Option<Candidate>> {
        let document = Html::parse_fragment(fragment);
        self.extract_element(document.root_element())
    }

    /// Parse an already-parsed result row.
    pub fn extract_element(&self, row: ElementRef<'_>) -> Result<Option<Candidate>> {
        if row.select(&self.sentinel).next().is_some() {
            return Ok(None);
        }

        let header = row
            .select(&self.header)
            .next()
            .ok_or_else(|| AppError::schema("title", "result row has no header"))?;

        let title = collapse_whitespace(&header.text().collect::<String>());
        if title.is_empty() {
            return Err(AppError::schema("title", "result header is empty"));
        }

        let Some(code) = self.code(header) else {
            log::debug!("Ignoring row without a song link: {title}");
            return Ok(None);
        };

        let (upvotes, downvotes) = self.votes(row)?;

        let difficulties = row
            .select(&self.difficulty)
            .map(|d| short_difficulty(d.text().collect::<String>().trim()))
            .collect();

        let published_at = Some(self.published(row)?);

        let download_url = row
            .select(&self.download)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| self.absolute(href));

        Ok(Some(Candidate {
            code,
            title,
            download_url,
            difficulties,
            upvotes,
            downvotes,
            uploader: self.uploader(row),
            published_at,
        }))
    }

    fn code(&self, header: ElementRef<'_>) -> Option<String> {
        let href = header
            .select(&self.header_link)
            .next()
            .and_then(|a| a.value().attr("href"))?;
        self.code_pattern
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Stat labels after the first are `upvotes, downvotes`.
    fn votes(&self, row: ElementRef<'_>) -> Result<(u64, u64)> {
        let stats = row
            .select(&self.stat)
            .skip(1)
            .take(2)
            .map(|s| parse_count(&s.text().collect::<String>()))
            .collect::<Result<Vec<_>>>()?;

        match stats.as_slice() {
            [up, down] => Ok((*up, *down)),
            _ => Ok((0, 0)),
        }
    }

    fn uploader(&self, row: ElementRef<'_>) -> String {
        let Some(block) = row.select(&self.mapper).next() else {
            return String::new();
        };
        let linked = block
            .select(&self.mapper_link)
            .find_map(|a| self.first_word(&a.text().collect::<String>()));
        if let Some(handle) = linked {
            return handle;
        }

        let text: String = block.text().collect();
        self.mapper_after_newline
            .captures(&text)
            .or_else(|| self.word.captures(&text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn first_word(&self, text: &str) -> Option<String> {
        self.word
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn published(&self, row: ElementRef<'_>) -> Result<NaiveDate> {
        let raw = row
            .select(&self.time)
            .next()
            .and_then(|t| t.value().attr(&self.time_attr))
            .ok_or_else(|| AppError::schema("date", "result row has no timestamp"))?;

        parse_date(raw)
            .ok_or_else(|| AppError::schema("date", format!("malformed timestamp '{raw}'")))
    }

    fn absolute(&self, href: &str) -> String {
        match &self.base_url {
            Some(base) => resolve_url(base, href),
            None => href.to_string(),
        }
    }
}

/// Shorten a canonical difficulty name; unknown labels pass through.
pub fn short_difficulty(label: &str) -> String {
    let short = match label {
        "Easy" => "Ea",
        "Normal" => "No",
        "Hard" => "Ha",
        "Expert" => "Ex",
        "Expert+" => "Ex+",
        "Standard" => "St",
        "Advanced" => "Ad",
        other => other,
    };
    short.to_string()
}

fn parse_count(text: &str) -> Result<u64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    cleaned
        .parse()
        .map_err(|_| AppError::schema("votes", format!("non-numeric vote label '{}'", text.trim())))
}

/// Parse an ISO-8601 timestamp (with or without offset) or a plain date.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
