use serde::{Deserialize, Serialize};

/// TMDB movie identifier
pub type MovieId = u64;

/// Identity and display fields for one catalog item
///
/// Field names follow TMDB's JSON so list payloads deserialize directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl MovieSummary {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: None,
            release_date: None,
            vote_average: None,
            genre_ids: Vec::new(),
        }
    }

    /// Rating used for ranking; unrated movies count as 0
    pub fn rating(&self) -> f64 {
        self.vote_average.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full record returned by `/movie/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

/// TMDB list envelope (popular, discover, search, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieListResponse {
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Where a search result came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// The cached aggregate catalog
    Catalog,
    /// A direct remote search query
    Remote,
}

/// A movie plus its provenance for the life of one search call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub source: ResultSource,
}

impl SearchResult {
    pub fn tag(movies: Vec<MovieSummary>, source: ResultSource) -> Vec<Self> {
        movies
            .into_iter()
            .map(|movie| SearchResult { movie, source })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_deserializes_tmdb_list_item() {
        let json = r#"{
            "adult": false,
            "id": 603,
            "title": "The Matrix",
            "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
            "backdrop_path": null,
            "overview": "Set in the 22nd century...",
            "release_date": "1999-03-30",
            "vote_average": 8.2,
            "genre_ids": [28, 878]
        }"#;

        let movie: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.backdrop_path, None);
        assert_eq!(movie.vote_average, Some(8.2));
        assert_eq!(movie.genre_ids, vec![28, 878]);
    }

    #[test]
    fn test_summary_tolerates_missing_optional_fields() {
        let movie: MovieSummary = serde_json::from_str(r#"{"id": 1, "title": "Heat"}"#).unwrap();
        assert_eq!(movie, MovieSummary::new(1, "Heat"));
        assert_eq!(movie.rating(), 0.0);
    }

    #[test]
    fn test_summary_requires_title() {
        let result = serde_json::from_str::<MovieSummary>(r#"{"id": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_detail_deserializes_with_genres() {
        let json = r#"{
            "id": 949,
            "title": "Heat",
            "overview": "Obsessive master thief Neil McCauley...",
            "vote_average": 7.9,
            "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}],
            "runtime": 170,
            "tagline": "A Los Angeles crime saga",
            "imdb_id": "tt0113277"
        }"#;

        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.summary.id, 949);
        assert!(detail.summary.genre_ids.is_empty());
        assert_eq!(detail.genres.len(), 2);
        assert_eq!(detail.genres[1].name, "Crime");
        assert_eq!(detail.runtime, Some(170));
        assert_eq!(detail.imdb_id.as_deref(), Some("tt0113277"));
    }

    #[test]
    fn test_search_result_serializes_flat_with_source() {
        let results = SearchResult::tag(vec![MovieSummary::new(7, "Se7en")], ResultSource::Remote);
        let json = serde_json::to_value(&results[0]).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Se7en");
        assert_eq!(json["source"], "remote");
    }
}
