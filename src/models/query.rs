//! User-requested song lookups.

use crate::models::Track;
use crate::utils::text::{canonical_name, collapse_whitespace};

/// One song lookup, created from an input line, CLI argument or playlist track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Input exactly as received
    pub raw_text: String,

    /// Catalog code pinned with a trailing `#code`
    pub explicit_code: Option<String>,

    /// Free text sent to the search endpoint
    pub search_text: String,

    /// Second search whose results are merged with the first
    pub fallback_text: Option<String>,
}

impl Query {
    /// Normalize a raw input line.
    ///
    /// `"Some Song #ABCD12"` pins code `ABCD12` with search text `"Some Song"`;
    /// anything else is searched verbatim (trimmed).
    pub fn normalize(raw: &str) -> Self {
        let (explicit_code, search_text) = match split_code(raw) {
            Some((text, code)) => (Some(code.to_string()), text.trim().to_string()),
            None => (None, raw.trim().to_string()),
        };

        Self {
            raw_text: raw.to_string(),
            explicit_code,
            search_text,
            fallback_text: None,
        }
    }

    /// Build a query from a playlist track.
    ///
    /// Searches `"<title> <artist>"` and merges in a title-only search.
    pub fn from_track(track: &Track) -> Self {
        let title = canonical_name(&track.title).unwrap_or_else(|| collapse_whitespace(&track.title));
        let search_text = collapse_whitespace(&format!("{} {}", title, track.artist));
        let fallback_text = (!title.is_empty() && title != search_text).then(|| title.clone());

        Self {
            raw_text: format!("{} - {}", track.title, track.artist),
            explicit_code: None,
            search_text,
            fallback_text,
        }
    }

    /// Text used when reporting on this query.
    pub fn label(&self) -> &str {
        if self.search_text.is_empty() {
            self.explicit_code.as_deref().unwrap_or_default()
        } else {
            &self.search_text
        }
    }

    /// Every search text this query issues, in order.
    pub fn search_texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.search_text.as_str()).chain(self.fallback_text.as_deref())
    }
}

/// Split a trailing `#code` marker off `raw`.
fn split_code(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim_end();
    let hash = trimmed.rfind('#')?;
    let code = &trimmed[hash + 1..];
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    if code.is_empty() || !code.chars().all(is_word) {
        return None;
    }
    Some((&trimmed[..hash], code))
}
