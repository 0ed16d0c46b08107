use std::cmp::Ordering;

use crate::models::MovieSummary;

/// Ranks an in-memory collection against a free-text query
///
/// Matches are movies whose title or overview contains the trimmed query,
/// case-insensitively. They are ordered by:
/// 1. exact title match
/// 2. title starting with the query
/// 3. descending `vote_average` (unrated = 0)
///
/// The sort is stable, so remaining ties keep their input order. A blank query
/// matches nothing.
pub fn search(collection: &[MovieSummary], query: &str) -> Vec<MovieSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(MatchRank, &MovieSummary)> = collection
        .iter()
        .filter_map(|movie| MatchRank::of(movie, &needle).map(|rank| (rank, movie)))
        .collect();

    matches.sort_by(|(a, _), (b, _)| a.cmp_priority(b));

    matches.into_iter().map(|(_, movie)| movie.clone()).collect()
}

/// Per-movie sort key, computed once per match
#[derive(Debug, Clone, Copy)]
struct MatchRank {
    exact: bool,
    prefix: bool,
    rating: f64,
}

impl MatchRank {
    fn of(movie: &MovieSummary, needle: &str) -> Option<Self> {
        let title = movie.title.to_lowercase();
        let in_title = title.contains(needle);
        let in_overview = movie
            .overview
            .as_deref()
            .is_some_and(|overview| overview.to_lowercase().contains(needle));

        if !in_title && !in_overview {
            return None;
        }

        Some(Self {
            exact: title == needle,
            prefix: title.starts_with(needle),
            rating: movie.rating(),
        })
    }

    /// `Less` means `self` ranks ahead of `other`
    fn cmp_priority(&self, other: &Self) -> Ordering {
        other
            .exact
            .cmp(&self.exact)
            .then_with(|| other.prefix.cmp(&self.prefix))
            .then_with(|| other.rating.total_cmp(&self.rating))
    }
}
