use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieSummary, WatchListEntry},
};

/// Key under which the watch-list is stored
pub const WATCH_LIST_KEY: &str = "myMovieList";

/// Minimal string key/value store, shaped like browser local storage
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
}

/// Process-local store; contents live only as long as the process
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        self.inner.write().await.insert(key.to_string(), value);
    }
}

/// The user's saved movies, stored as one JSON array under [`WATCH_LIST_KEY`]
///
/// Add and remove are idempotent set operations keyed by movie id.
#[derive(Clone)]
pub struct WatchList {
    store: Arc<dyn KeyValueStore>,
    /// Held across read-modify-write so concurrent edits are not lost
    write_lock: Arc<Mutex<()>>,
}

impl WatchList {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Saved entries in the order they were added
    pub async fn list(&self) -> AppResult<Vec<WatchListEntry>> {
        match self.store.get(WATCH_LIST_KEY).await {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::Internal(format!("Watch-list deserialization error: {}", e))
            }),
            None => Ok(Vec::new()),
        }
    }

    pub async fn contains(&self, id: MovieId) -> AppResult<bool> {
        Ok(self.list().await?.iter().any(|entry| entry.movie.id == id))
    }

    /// Adds a movie; re-adding keeps the original entry and timestamp
    pub async fn add(&self, movie: MovieSummary) -> AppResult<WatchListEntry> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.list().await?;

        if let Some(existing) = entries.iter().find(|entry| entry.movie.id == movie.id) {
            tracing::debug!(movie_id = movie.id, "Movie already in watch-list");
            return Ok(existing.clone());
        }

        let entry = WatchListEntry::new(movie);
        entries.push(entry.clone());
        self.save(&entries).await?;

        tracing::info!(movie_id = entry.movie.id, size = entries.len(), "Added to watch-list");

        Ok(entry)
    }

    /// Removes a movie; returns whether anything was removed
    pub async fn remove(&self, id: MovieId) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let entries = self.list().await?;
        let before = entries.len();
        let remaining: Vec<WatchListEntry> = entries
            .into_iter()
            .filter(|entry| entry.movie.id != id)
            .collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.save(&remaining).await?;
        tracing::info!(movie_id = id, size = remaining.len(), "Removed from watch-list");

        Ok(true)
    }

    async fn save(&self, entries: &[WatchListEntry]) -> AppResult<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| AppError::Internal(format!("Watch-list serialization error: {}", e)))?;
        self.store.set(WATCH_LIST_KEY, json).await;
        Ok(())
    }
}
