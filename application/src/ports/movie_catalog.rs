//! Movie catalog port
//!
//! Defines the interface to the external movie-metadata provider.
//! Implementations (adapters) live in the infrastructure layer; the
//! deck builder only ever sees this trait.

use async_trait::async_trait;
use reelmatch_domain::Movie;
use thiserror::Error;

/// Errors that can occur talking to the movie catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Catalog returned status {status}")]
    BadStatus { status: u16 },

    #[error("Could not decode catalog response: {0}")]
    Decode(String),
}

/// Sort order for discover queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most popular first (the catalog's default relevance)
    #[default]
    Popularity,
    /// Best rated first
    VoteAverage,
}

/// A filtered discover query, expressed in domain slugs.
///
/// Genre and provider values are the questionnaire/service slugs
/// (`"comedy"`, `"netflix"`); the adapter owns the mapping to catalog
/// ids. Unmappable slugs are skipped, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub genres: Vec<String>,
    pub providers: Vec<String>,
    /// Inclusive `YYYY-MM-DD` lower bound on release date
    pub release_after: Option<String>,
    /// Inclusive `YYYY-MM-DD` upper bound on release date
    pub release_before: Option<String>,
    pub min_vote_average: f64,
    pub min_vote_count: u32,
    pub sort: SortOrder,
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            providers: Vec::new(),
            release_after: None,
            release_before: None,
            min_vote_average: 6.0,
            min_vote_count: 100,
            sort: SortOrder::default(),
            page: 1,
        }
    }
}

impl DiscoverQuery {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Gateway to the external movie-metadata provider
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// One page of candidates matching the filter
    async fn discover(&self, query: &DiscoverQuery) -> Result<Vec<Movie>, CatalogError>;

    /// A single movie enriched with runtime, watch-provider, and
    /// certification data
    async fn movie_details(&self, movie_id: u64) -> Result<Movie, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_thresholds() {
        let query = DiscoverQuery::default();
        assert_eq!(query.min_vote_average, 6.0);
        assert_eq!(query.min_vote_count, 100);
        assert_eq!(query.page, 1);
        assert_eq!(query.sort, SortOrder::Popularity);
    }

    #[test]
    fn test_with_page() {
        let query = DiscoverQuery::default().with_page(2);
        assert_eq!(query.page, 2);
    }
}
