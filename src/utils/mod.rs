//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod text;

#[cfg(test)]
pub mod testing;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.zip"),
            "https://example.com/path/page.zip"
        );
        assert_eq!(
            resolve_url(&base, "/root.zip"),
            "https://example.com/root.zip"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }
}
