//! Search query normalization

use std::fmt;

/// A PubMed search term, normalized for use in a URL
///
/// Surrounding whitespace is trimmed and every control character (newline,
/// tab, carriage return, ...) is replaced with a space. The term is otherwise
/// passed to ESearch untouched.
///
/// # Example
///
/// ```
/// use pubmed_authorscan::SearchQuery;
///
/// let query = SearchQuery::new("  cancer\nimmunotherapy\tpharma ");
/// assert_eq!(query.as_str(), "cancer immunotherapy pharma");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
