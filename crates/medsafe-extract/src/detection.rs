//! Candidate medicine names from free text.

use std::collections::HashSet;

/// Maximum number of candidates returned by [`detect_medicines`].
pub const MAX_DETECTED: usize = 10;

/// Minimum candidate length (exclusive).
const MIN_TOKEN_LEN: usize = 2;

/// Maximum candidate length (inclusive).
const MAX_TOKEN_LEN: usize = 31;

/// Extract candidate medicine names from free text.
///
/// A candidate is a maximal run of ASCII alphanumerics and `-` that starts
/// with a letter and is 3 to 31 characters long. Candidates are deduplicated
/// case-insensitively, keeping the first spelling, and capped at
/// [`MAX_DETECTED`].
pub fn detect_medicines(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut found = Vec::new();

    for token in tokens(text) {
        if found.len() == MAX_DETECTED {
            break;
        }
        if !is_candidate(token) {
            continue;
        }
        if seen.insert(token.to_ascii_lowercase()) {
            found.push(token.to_string());
        }
    }

    found
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .filter(|t| !t.is_empty())
}

fn is_candidate(token: &str) -> bool {
    let starts_with_letter = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());

    starts_with_letter && token.len() > MIN_TOKEN_LEN && token.len() <= MAX_TOKEN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_prescription_line() {
        let found = detect_medicines("Rx: Dolo-650 1 tab TDS, Augmentin 625mg BD x5d");
        assert_eq!(found, vec!["Dolo-650", "tab", "TDS", "Augmentin", "x5d"]);
    }

    #[test]
    fn test_short_and_numeric_tokens_skipped() {
        let found = detect_medicines("Rx 500 mg of ibuprofen, 2x");
        assert_eq!(found, vec!["ibuprofen"]);
    }

    #[test]
    fn test_dedup_case_insensitive_keeps_first() {
        let found = detect_medicines("Crocin then crocin then CROCIN");
        assert_eq!(found, vec!["Crocin", "then"]);
    }

    #[test]
    fn test_length_bounds() {
        let long = "a".repeat(32);
        let edge = "b".repeat(31);
        let found = detect_medicines(&format!("{long} {edge} abc"));
        assert_eq!(found, vec![edge, "abc".to_string()]);
    }

    #[test]
    fn test_capped_at_max() {
        let text = (0..20)
            .map(|i| format!("med{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let found = detect_medicines(&text);
        assert_eq!(found.len(), MAX_DETECTED);
        assert_eq!(found[0], "med0");
        assert_eq!(found[9], "med9");
    }

    #[test]
    fn test_non_ascii_splits_tokens() {
        assert_eq!(detect_medicines("paracétamol"), vec!["parac", "tamol"]);
        assert_eq!(detect_medicines("ibuprofen·diclofenac"), vec!["ibuprofen", "diclofenac"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(detect_medicines("").is_empty());
        assert!(detect_medicines("  ,;  12 ").is_empty());
    }
}
