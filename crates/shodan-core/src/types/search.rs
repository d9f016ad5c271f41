use super::{Banner, Facets};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Search results from /shodan/host/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching banners
    pub matches: Vec<Banner>,

    /// Total number of results across all pages
    pub total: u64,

    /// Facet aggregations if requested
    #[serde(default)]
    pub facets: Facets,
}

impl SearchResults {
    /// Returns true if there are no results on this page
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the number of matches in this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Host count result from /shodan/host/count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostCount {
    pub total: u64,

    #[serde(default)]
    pub facets: Facets,
}

/// Parsed query tokens from /shodan/host/search/tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTokens {
    /// Parsed filter attributes
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,

    /// Parsing errors
    #[serde(default)]
    pub errors: Vec<String>,

    /// Free-text part of the query
    #[serde(default)]
    pub string: String,

    /// Filters used in the query
    #[serde(default)]
    pub filters: Vec<String>,
}

impl QueryTokens {
    /// Returns true if there were any parsing errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_results_with_facets() {
        let results: SearchResults = serde_json::from_str(
            r#"{
                "matches": [{"ip_str": "1.1.1.1", "port": 22}],
                "total": 1204,
                "facets": {"country": [{"value": "US", "count": 800}]}
            }"#,
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results.total, 1204);
        assert_eq!(results.facets["country"][0].as_str(), Some("US"));
    }

    #[test]
    fn test_tokens_errors() {
        let tokens: QueryTokens =
            serde_json::from_str(r#"{"string": "apache", "errors": ["bad filter"]}"#).unwrap();
        assert!(tokens.has_errors());
        assert!(tokens.filters.is_empty());
    }
}
