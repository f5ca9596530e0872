// src/utils/text.rs

//! Text helpers shared by the normalizer, extractor and fetcher.

use unicode_segmentation::UnicodeSegmentation;

/// Collapse whitespace (including newlines) into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical short name of an upstream title.
///
/// Keeps the leading run before the first `(`, `,`, `-` or `[`.
/// Returns `None` when nothing meaningful is left.
pub fn canonical_name(title: &str) -> Option<String> {
    let head = title
        .split(['(', ',', '-', '['])
        .next()
        .unwrap_or_default()
        .trim();
    (!head.is_empty()).then(|| head.to_string())
}

/// Replace filesystem-hostile runs (slashes, whitespace, en-dashes) with `_`.
pub fn sanitize_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_run = false;
    for c in title.trim().chars() {
        if c == '/' || c == '\\' || c == '\u{2013}' || c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Encode a free-text query for the search endpoint.
///
/// Whitespace runs become a single literal `+`; everything else is
/// form-url-encoded.
pub fn encode_query(query: &str) -> String {
    collapse_whitespace(query)
        .split(' ')
        .map(|word| url::form_urlencoded::byte_serialize(word.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("+")
}

/// Break `text` into lines of at most `width` graphemes.
pub fn wrap_graphemes(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    graphemes
        .chunks(width)
        .map(|chunk| chunk.concat())
        .collect::<Vec<_>>()
        .join("\n")
}
