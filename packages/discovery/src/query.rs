//! Search query construction.
//!
//! Builds the search string from the fixed role vocabulary and a site
//! restriction. Deterministic: the same config always yields the same
//! query, so paginated offsets stay meaningful across pages.

use crate::types::DiscoveryConfig;

/// A fully built search query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Build the query from the config's role vocabulary and site.
    ///
    /// Roles are quoted and OR-joined so multi-word titles match as
    /// phrases; an empty site skips the `site:` operator.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let roles = config
            .roles
            .iter()
            .map(|r| format!("\"{}\"", r))
            .collect::<Vec<_>>()
            .join(" OR ");

        let query = if config.site.is_empty() {
            format!("({roles})")
        } else {
            format!("({roles}) site:{}", config.site)
        };

        Self(query)
    }

    /// The raw query string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_quotes_and_joins_roles() {
        let config = DiscoveryConfig::default()
            .with_roles(["software engineer", "devops engineer"])
            .with_site("jobs.example.com");

        let query = SearchQuery::from_config(&config);
        assert_eq!(
            query.as_str(),
            r#"("software engineer" OR "devops engineer") site:jobs.example.com"#
        );
    }

    #[test]
    fn test_query_without_site() {
        let config = DiscoveryConfig::default()
            .with_roles(["qa engineer"])
            .with_site("");

        let query = SearchQuery::from_config(&config);
        assert_eq!(query.as_str(), r#"("qa engineer")"#);
    }

    #[test]
    fn test_query_is_deterministic() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            SearchQuery::from_config(&config),
            SearchQuery::from_config(&config)
        );
    }
}
