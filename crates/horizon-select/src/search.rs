//! Search filtering of panel options.
//!
//! A query is split on whitespace into terms; an option matches when its
//! label contains any term, ignoring case. Queries shorter than
//! [`MIN_QUERY_CHARS`] (after trimming) disable filtering altogether.
//!
//! The controller runs the filter [`SEARCH_DEBOUNCE`] after the last
//! keystroke; each keystroke replaces the pending run.

use std::time::Duration;

/// Delay between the last keystroke and filtering.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum trimmed query length that filters anything.
pub const MIN_QUERY_CHARS: usize = 2;

/// A parsed, active search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    terms: Vec<String>,
}

impl SearchFilter {
    /// Parse a query. Returns `None` when the query is too short to filter.
    pub fn parse(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        let terms = query.split_whitespace().map(str::to_lowercase).collect();
        Some(Self { terms })
    }

    /// The lowercased terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether `label` contains any of the terms, ignoring case.
    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.terms.iter().any(|term| label.contains(term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_queries_do_not_filter() {
        assert_eq!(SearchFilter::parse(""), None);
        assert_eq!(SearchFilter::parse("a"), None);
        assert_eq!(SearchFilter::parse("  b   "), None);
        assert!(SearchFilter::parse("ab").is_some());
    }

    #[test]
    fn test_terms_split_on_whitespace() {
        let filter = SearchFilter::parse("  Red \t  BLUE  ").unwrap();
        assert_eq!(filter.terms(), ["red", "blue"]);
    }

    #[test]
    fn test_any_term_matches_case_insensitively() {
        let filter = SearchFilter::parse("app ban").unwrap();
        assert!(filter.matches("Apple"));
        assert!(filter.matches("Green BANANA"));
        assert!(!filter.matches("Cherry"));
    }

    #[test]
    fn test_substring_anywhere_in_label() {
        let filter = SearchFilter::parse("err").unwrap();
        assert!(filter.matches("Cherry"));
        assert!(filter.matches("Strawberry"));
        assert!(!filter.matches("Kiwi"));
    }

    #[test]
    fn test_multibyte_query_length_counts_chars() {
        assert_eq!(SearchFilter::parse("é"), None);
        let filter = SearchFilter::parse("éc").unwrap();
        assert!(filter.matches("Écume"));
    }
}
