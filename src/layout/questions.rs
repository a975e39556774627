//! Question marker extraction.

use std::collections::HashSet;

use super::patterns::PatternSet;
use crate::model::Page;

/// Question numbers starting on a page, in token order, first occurrence
/// of each number only.
pub fn question_starts(page: &Page, patterns: &PatternSet) -> Vec<u32> {
    let mut seen = HashSet::new();
    page.tokens()
        .iter()
        .filter_map(|t| patterns.question_marker(&t.text))
        .map(|(_, n)| n)
        .filter(|n| seen.insert(*n))
        .collect()
}

/// `"first"` or `"first-last"` label for a page's question markers.
///
/// Only the first and last entries are used; `[3, 7]` labels as `"3-7"`
/// even though 4 to 6 never appeared on the page.
pub fn question_range(starts: &[u32]) -> Option<String> {
    match (starts.first(), starts.last()) {
        (Some(first), Some(last)) if first == last => Some(first.to_string()),
        (Some(first), Some(last)) => Some(format!("{}-{}", first, last)),
        _ => None,
    }
}
