// src/extractors/field.rs
use crate::utils::error::ExtractError;
use regex::{Regex, RegexBuilder};

/// Compiles a single-line field pattern. Matching is always case-insensitive.
pub fn field_regex(field: &str, pattern: &str) -> Result<Regex, ExtractError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern {
            field: field.to_string(),
            source,
        })
}

/// Returns the value of the leftmost match of `re` in `text`, or an empty string.
///
/// The value is the *last* capture group of the pattern, so label aliases can be
/// expressed as alternation in front of the value group. Later occurrences of the
/// same label are ignored. Nothing is trimmed beyond what the pattern captures.
pub fn extract_field(text: &str, re: &Regex) -> String {
    let Some(caps) = re.captures(text) else {
        return String::new();
    };

    // Group 0 is the whole match; a pattern without groups yields the match itself.
    caps.get(caps.len() - 1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(pattern: &str, text: &str) -> String {
        let re = field_regex("test", pattern).unwrap();
        extract_field(text, &re)
    }

    #[test]
    fn test_first_match_wins() {
        let text = "MRN: A123\nsome notes\nMRN: B999\n";
        assert_eq!(field(r"MRN\s*[:\-]?\s*([A-Za-z0-9]+)", text), "A123");
    }

    #[test]
    fn test_missing_label_is_empty() {
        assert_eq!(field(r"MRN\s*[:\-]?\s*([A-Za-z0-9]+)", "nothing here"), "");
        assert_eq!(field(r"MRN\s*[:\-]?\s*([A-Za-z0-9]+)", ""), "");
    }

    #[test]
    fn test_case_insensitive_label() {
        assert_eq!(field(r"Age\s*[:\-]?\s*(\d{1,3})", "AGE - 61"), "61");
    }

    #[test]
    fn test_last_group_is_value_with_aliases() {
        let pattern = r"(BP|Blood Pressure)\s*[:\-]?\s*(\d{2,3}/\d{2,3})";
        assert_eq!(field(pattern, "Blood Pressure: 135/85"), "135/85");
        assert_eq!(field(pattern, "bp 110/70"), "110/70");
    }

    #[test]
    fn test_unmatched_optional_last_group_is_empty() {
        // The trailing unit group does not participate, so the value is empty.
        assert_eq!(field(r"Temp\s*(\d{2,3})(F)?", "Temp 98"), "");
    }

    #[test]
    fn test_value_not_trimmed_beyond_pattern() {
        assert_eq!(field(r"Name\s*[:\-]?\s*([^\r\n]+)", "Name: Doe, Jane.\r\n"), "Doe, Jane.");
    }

    #[test]
    fn test_invalid_pattern_reports_field() {
        let err = field_regex("Broken", r"(unclosed").unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }
}
