use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieSummary;

/// A saved movie, stamped with when it was added
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchListEntry {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl WatchListEntry {
    pub fn new(movie: MovieSummary) -> Self {
        Self {
            movie,
            added_at: Utc::now(),
        }
    }
}
