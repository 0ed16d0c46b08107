use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::{
    error::{FetchError, FetchResult},
    models::{Category, MovieSummary},
    services::providers::CatalogProvider,
};

/// How long an aggregated catalog is served without refetching
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(5 * 60);

/// Per-category fetch timeout used when none is configured
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One settled category fetch
type CategoryOutcome = (Category, FetchResult<Vec<MovieSummary>>);

/// Snapshot of the merged catalog
///
/// Never mutated after construction; a rebuild produces a new value that is
/// swapped in whole.
#[derive(Debug, Default)]
pub struct MergedCacheState {
    pub entries: Arc<Vec<MovieSummary>>,
    /// Monotonic build time, `None` until the first successful build
    pub built_at: Option<Instant>,
    /// Wall-clock build time, for reporting
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl MergedCacheState {
    fn built(entries: Vec<MovieSummary>) -> Self {
        Self {
            entries: Arc::new(entries),
            built_at: Some(Instant::now()),
            refreshed_at: Some(Utc::now()),
        }
    }

    /// Whether the snapshot can be served without a rebuild
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        !self.entries.is_empty() && self.built_at.is_some_and(|at| at.elapsed() < ttl)
    }
}

/// Deduplicated catalog spanning every [`Category`], refreshed at most once per TTL
///
/// Each instance owns its own state, so independent caches never share a
/// snapshot.
pub struct AggregationCache {
    provider: Arc<dyn CatalogProvider>,
    ttl: Duration,
    fetch_timeout: Duration,
    state: RwLock<Arc<MergedCacheState>>,
    /// Serializes rebuilds so one expiry triggers one round of fetches
    rebuild_guard: Mutex<()>,
}

impl AggregationCache {
    pub fn new(provider: Arc<dyn CatalogProvider>, ttl: Duration, fetch_timeout: Duration) -> Self {
        Self {
            provider,
            ttl,
            fetch_timeout,
            state: RwLock::new(Arc::new(MergedCacheState::default())),
            rebuild_guard: Mutex::new(()),
        }
    }

    pub fn with_defaults(provider: Arc<dyn CatalogProvider>) -> Self {
        Self::new(provider, DEFAULT_CATALOG_TTL, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current snapshot, without triggering a rebuild
    pub async fn snapshot(&self) -> Arc<MergedCacheState> {
        self.state.read().await.clone()
    }

    /// Returns the aggregated catalog, rebuilding it if empty or expired
    ///
    /// Never fails: category failures shrink the rebuilt catalog, and a rebuild
    /// in which every category fails leaves the previous snapshot in place.
    pub async fn get_aggregated_catalog(&self) -> Arc<Vec<MovieSummary>> {
        let current = self.snapshot().await;
        if current.is_fresh(self.ttl) {
            return current.entries.clone();
        }

        let _guard = self.rebuild_guard.lock().await;

        // Another caller may have rebuilt while we waited for the guard
        let current = self.snapshot().await;
        if current.is_fresh(self.ttl) {
            return current.entries.clone();
        }

        let outcomes = self.fetch_all().await;
        match merge(outcomes) {
            Some(entries) => {
                tracing::info!(
                    movies = entries.len(),
                    provider = self.provider.name(),
                    "Aggregated catalog rebuilt"
                );
                let next = Arc::new(MergedCacheState::built(entries));
                *self.state.write().await = next.clone();
                next.entries.clone()
            }
            None => {
                tracing::error!(
                    stale_movies = current.entries.len(),
                    "Every category fetch failed; serving previous catalog"
                );
                current.entries.clone()
            }
        }
    }

    /// Fetches every category concurrently and waits for all of them to settle
    ///
    /// Each fetch has its own timeout; one slow or failing category never
    /// cancels the others.
    async fn fetch_all(&self) -> Vec<CategoryOutcome> {
        let mut tasks = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let provider = Arc::clone(&self.provider);
            let timeout = self.fetch_timeout;
            let task = tokio::spawn(async move {
                match tokio::time::timeout(timeout, provider.fetch_category(category)).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout(timeout)),
                }
            });
            tasks.push((category, task));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (category, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(FetchError::Aborted(e.to_string())),
            };
            outcomes.push((category, result));
        }

        outcomes
    }
}

/// Folds settled category fetches into one catalog
///
/// Failed categories contribute nothing. Returns `None` only when every
/// category failed.
fn merge(outcomes: Vec<CategoryOutcome>) -> Option<Vec<MovieSummary>> {
    let mut succeeded = 0;
    let mut failed = 0;
    let mut combined = Vec::new();

    for (category, result) in outcomes {
        match result {
            Ok(movies) => {
                succeeded += 1;
                combined.extend(movies);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(category = %category, error = %e, "Category fetch failed");
            }
        }
    }

    if failed > 0 {
        tracing::warn!(
            success_count = succeeded,
            error_count = failed,
            "Partial catalog fetch failure"
        );
    }

    if succeeded == 0 {
        return None;
    }

    Some(dedup_by_id(combined))
}

/// Drops repeated ids, keeping the first occurrence and the survivors' order
pub fn dedup_by_id(movies: impl IntoIterator<Item = MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    movies
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .collect()
}
