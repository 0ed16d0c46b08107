/// Remote catalog abstraction
///
/// The aggregation cache and the search service only ever talk to a
/// `CatalogProvider`, so tests can swap TMDB for an in-memory fake.
use crate::{
    error::FetchResult,
    models::{Category, MovieDetail, MovieId, MovieSummary},
};

pub mod tmdb;

pub use tmdb::{ImageUrls, TmdbProvider};

/// Trait for movie metadata sources
///
/// Every call is bounded by the provider's own request timeout and reports
/// failures as a [`crate::error::FetchError`], never by hanging.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch page 1 of a fixed category list
    async fn fetch_category(&self, category: Category) -> FetchResult<Vec<MovieSummary>>;

    /// Fetch full details for one movie
    async fn fetch_by_id(&self, id: MovieId) -> FetchResult<MovieDetail>;

    /// Free-text search against the remote catalog (page 1)
    async fn search_remote(&self, query: &str) -> FetchResult<Vec<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
