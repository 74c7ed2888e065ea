// src/extractors/block.rs
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// Any run of line breaks inside an excerpt collapses to one space.
static NEWLINE_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\r\n]+").expect("Failed to compile NEWLINE_RUN_RE")
});

/// Compiles a section header into a block pattern: the header, a separator
/// (colon or line breaks), then a window of at most `max_len` characters.
/// The window spans line breaks and is greedy up to the cap.
pub fn block_regex(field: &str, header: &str, max_len: usize) -> Result<Regex, ExtractError> {
    let pattern = format!(r"(?:{header})[:\n\r]+(.{{1,{max_len}}})");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern {
            field: field.to_string(),
            source,
        })
}

/// Compiles the header-plus-separator marker used to detect where another section begins.
pub fn header_marker_regex(field: &str, header: &str) -> Result<Regex, ExtractError> {
    RegexBuilder::new(&format!(r"(?:{header})[:\n\r]"))
        .case_insensitive(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern {
            field: field.to_string(),
            source,
        })
}

/// Returns the raw (un-normalized) window following the first header match.
pub fn raw_window<'t>(text: &'t str, re: &Regex) -> Option<&'t str> {
    let caps = re.captures(text)?;
    caps.get(caps.len() - 1).map(|m| m.as_str())
}

/// Trims the excerpt and folds every line-break run into a single space.
pub fn normalize_excerpt(raw: &str) -> String {
    NEWLINE_RUN_RE.replace_all(raw.trim(), " ").into_owned()
}

/// Extracts the excerpt after the first header match as a plain character
/// window. The window has no notion of the next section and may run into it.
pub fn extract_block(text: &str, re: &Regex) -> String {
    raw_window(text, re)
        .map(normalize_excerpt)
        .unwrap_or_default()
}

/// Like [`extract_block`], but the window is cut at the earliest position where
/// any of `markers` matches inside it.
pub fn extract_block_until(text: &str, re: &Regex, markers: &[Regex]) -> String {
    let Some(window) = raw_window(text, re) else {
        return String::new();
    };

    let cut = markers
        .iter()
        .filter_map(|marker| marker.find(window).map(|m| m.start()))
        .min()
        .unwrap_or(window.len());

    tracing::trace!("Block window {} bytes, cut at {}", window.len(), cut);
    normalize_excerpt(&window[..cut])
}
