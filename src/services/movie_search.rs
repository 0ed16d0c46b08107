use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{ResultSource, SearchResult},
    services::{catalog::AggregationCache, providers::CatalogProvider, ranking},
};

/// Where a search looks first
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Rank the aggregated catalog, falling back to remote search on zero matches
    #[default]
    Local,
    /// Query the remote search endpoint directly
    Remote,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: SearchMode,
    pub results: Vec<SearchResult>,
    pub catalog_count: usize,
    pub remote_count: usize,
}

impl SearchResponse {
    fn new(query: &str, mode: SearchMode, results: Vec<SearchResult>) -> Self {
        let catalog_count = results
            .iter()
            .filter(|r| r.source == ResultSource::Catalog)
            .count();
        Self {
            query: query.to_string(),
            mode,
            remote_count: results.len() - catalog_count,
            catalog_count,
            results,
        }
    }
}

/// Runs searches against the cached catalog and the remote provider
///
/// Stateless between calls: every request is answered from its own query and
/// mode, so switching modes always re-queries.
#[derive(Clone)]
pub struct MovieSearchService {
    catalog: Arc<AggregationCache>,
    provider: Arc<dyn CatalogProvider>,
}

impl MovieSearchService {
    pub fn new(catalog: Arc<AggregationCache>, provider: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog, provider }
    }

    pub async fn search(&self, query: &str, mode: SearchMode) -> AppResult<SearchResponse> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(SearchResponse::new(trimmed, mode, Vec::new()));
        }

        let results = match mode {
            SearchMode::Local => {
                let catalog = self.catalog.get_aggregated_catalog().await;
                let local = ranking::search(&catalog, trimmed);

                tracing::info!(
                    query = %trimmed,
                    catalog_size = catalog.len(),
                    results = local.len(),
                    "Local search completed"
                );

                if local.is_empty() {
                    tracing::info!(query = %trimmed, "No local matches, falling back to remote search");
                    self.remote(trimmed).await?
                } else {
                    SearchResult::tag(local, ResultSource::Catalog)
                }
            }
            SearchMode::Remote => self.remote(trimmed).await?,
        };

        Ok(SearchResponse::new(trimmed, mode, results))
    }

    async fn remote(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let movies = self.provider.search_remote(query).await?;
        Ok(SearchResult::tag(movies, ResultSource::Remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, FetchError};
    use crate::models::{Category, MovieSummary};
    use crate::services::providers::MockCatalogProvider;
    use mockall::predicate::eq;

    fn catalog_movies() -> Vec<MovieSummary> {
        vec![
            MovieSummary {
                vote_average: Some(7.9),
                ..MovieSummary::new(949, "Heat")
            },
            MovieSummary {
                vote_average: Some(8.2),
                ..MovieSummary::new(603, "The Matrix")
            },
        ]
    }

    /// Mock whose categories all return the same small catalog
    fn mock_with_catalog() -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_fetch_category()
            .returning(|category| match category {
                Category::Popular => Ok(catalog_movies()),
                _ => Ok(Vec::new()),
            });
        provider.expect_name().return_const("mock");
        provider
    }

    fn service(provider: MockCatalogProvider) -> MovieSearchService {
        let provider: Arc<dyn CatalogProvider> = Arc::new(provider);
        let catalog = Arc::new(AggregationCache::with_defaults(provider.clone()));
        MovieSearchService::new(catalog, provider)
    }

    #[tokio::test]
    async fn test_local_hits_are_tagged_catalog_and_skip_remote() {
        let mut provider = mock_with_catalog();
        provider.expect_search_remote().never();

        let response = service(provider).search("  matrix ", SearchMode::Local).await.unwrap();

        assert_eq!(response.query, "matrix");
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].movie.id, 603);
        assert_eq!(response.results[0].source, ResultSource::Catalog);
        assert_eq!(response.catalog_count, 1);
        assert_eq!(response.remote_count, 0);
    }

    #[tokio::test]
    async fn test_local_miss_falls_back_to_remote() {
        let mut provider = mock_with_catalog();
        provider
            .expect_search_remote()
            .with(eq("alien"))
            .times(1)
            .returning(|_| Ok(vec![MovieSummary::new(348, "Alien")]));

        let response = service(provider).search("alien", SearchMode::Local).await.unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].source, ResultSource::Remote);
        assert_eq!(response.remote_count, 1);
    }

    #[tokio::test]
    async fn test_remote_mode_always_queries_remote() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_fetch_category().never();
        provider
            .expect_search_remote()
            .with(eq("heat"))
            .times(2)
            .returning(|_| Ok(vec![MovieSummary::new(949, "Heat")]));

        let service = service(provider);
        let first = service.search("heat", SearchMode::Remote).await.unwrap();
        let second = service.search("heat", SearchMode::Remote).await.unwrap();

        assert_eq!(first.results, second.results);
        assert_eq!(first.results[0].source, ResultSource::Remote);
    }

    #[tokio::test]
    async fn test_switching_modes_requeries() {
        let mut provider = mock_with_catalog();
        provider
            .expect_search_remote()
            .times(1)
            .returning(|_| Ok(vec![MovieSummary::new(1, "Heat Remote")]));

        let service = service(provider);
        let local = service.search("heat", SearchMode::Local).await.unwrap();
        let remote = service.search("heat", SearchMode::Remote).await.unwrap();
        let local_again = service.search("heat", SearchMode::Local).await.unwrap();

        assert_eq!(local.results[0].source, ResultSource::Catalog);
        assert_eq!(remote.results[0].movie.id, 1);
        assert_eq!(local_again.results, local.results);
    }

    #[tokio::test]
    async fn test_blank_query_touches_nothing() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_fetch_category().never();
        provider.expect_search_remote().never();

        let service = service(provider);
        for mode in [SearchMode::Local, SearchMode::Remote] {
            let response = service.search("   ", mode).await.unwrap();
            assert!(response.results.is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_surfaced() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search_remote()
            .returning(|_| Err(FetchError::MissingCredential));

        let result = service(provider).search("heat", SearchMode::Remote).await;

        assert!(matches!(result, Err(AppError::MissingCredential(_))));
    }
}
