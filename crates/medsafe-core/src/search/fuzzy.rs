//! Similarity-ranked name lookup.
//!
//! Scores every catalog name (display name, generic, each brand) against a
//! query. Used where the query comes from free text rather than the search
//! box: brand mapping and detected-medicine suggestions.

use std::cmp::Ordering;

use strsim::{jaro_winkler, normalized_levenshtein};

use super::SearchIndex;

/// Minimum similarity for a name to be suggested.
pub const MIN_SIMILARITY: f64 = 0.60;

/// Score given when one string contains the other.
const CONTAINMENT_SCORE: f64 = 0.90;

/// Default number of suggestions.
pub const DEFAULT_FUZZY_LIMIT: usize = 5;

/// A catalog name with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub name: String,
    pub score: f64,
}

impl<'a> SearchIndex<'a> {
    /// Catalog names similar to `query`, best first, at most `limit`.
    ///
    /// Names are deduplicated case-insensitively; equal scores keep catalog
    /// order.
    pub fn fuzzy_find(&self, query: &str, limit: usize) -> Vec<NameMatch> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut seen: Vec<String> = Vec::new();
        let mut scored: Vec<NameMatch> = Vec::new();

        for record in self.catalog().iter() {
            let names = [record.name.as_str(), record.generic.as_str()]
                .into_iter()
                .chain(record.brands.iter().map(|b| b.brand.as_str()));

            for name in names {
                let name_lower = name.to_lowercase();
                if name_lower.is_empty() || seen.contains(&name_lower) {
                    continue;
                }
                let score = similarity(&query_lower, &name_lower);
                seen.push(name_lower);
                if score >= MIN_SIMILARITY {
                    scored.push(NameMatch {
                        name: name.to_string(),
                        score,
                    });
                }
            }
        }

        // Stable sort keeps catalog order among equal scores
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

/// Similarity of two lowercase strings (0.0 - 1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let base = fuzzy_match(a, b);
    if a.contains(b) || b.contains(a) {
        base.max(CONTAINMENT_SCORE)
    } else {
        base
    }
}

/// Combined Jaro-Winkler and normalized Levenshtein similarity.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler weighted higher: typos cluster at the end of drug names
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}
