/// TMDB (The Movie Database) provider
///
/// API Flow:
/// 1. Category rows: /movie/{popular,now_playing,top_rated,upcoming} and
///    /discover/movie?with_genres=… → MovieListResponse
/// 2. Details: /movie/{id} → MovieDetail
/// 3. Search: /search/movie?query=… → MovieListResponse
///
/// Only page 1 of any list is ever requested.
use crate::{
    config::Config,
    error::{FetchError, FetchResult},
    models::{Category, MovieDetail, MovieId, MovieListResponse, MovieSummary},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const FIRST_PAGE: &str = "1";
const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "original";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    language: String,
    timeout: Duration,
}

/// Builds image CDN URLs from the relative paths TMDB returns
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.tmdb_image_url.trim_end_matches('/').to_string(),
        }
    }

    /// Poster-sized image URL
    pub fn poster(&self, path: &str) -> String {
        self.sized(path, POSTER_SIZE)
    }

    /// Full-resolution backdrop URL
    pub fn backdrop(&self, path: &str) -> String {
        self.sized(path, BACKDROP_SIZE)
    }

    pub fn sized(&self, path: &str, size: &str) -> String {
        format!("{}/{}{}", self.base, size, path)
    }
}

impl TmdbProvider {
    /// Creates a TMDB provider whose HTTP client enforces the configured timeout
    pub fn new(config: &Config) -> FetchResult<Self> {
        let timeout = config.request_timeout();
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        let api_key = config
            .tmdb_api_key
            .clone()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set; every catalog request will fail");
        }

        Ok(Self {
            http_client,
            api_key,
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            language: config.tmdb_language.clone(),
            timeout,
        })
    }

    fn api_key(&self) -> FetchResult<&str> {
        self.api_key.as_deref().ok_or(FetchError::MissingCredential)
    }

    /// Query parameters specific to one category endpoint
    fn category_params(category: Category) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", FIRST_PAGE.to_string())];
        if let Some(genre_id) = category.genre_id() {
            params.push(("sort_by", "popularity.desc".to_string()));
            params.push(("with_genres", genre_id.to_string()));
        }
        params
    }

    /// The request URL carries the API key, so it is stripped from the error
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err.without_url())
        }
    }

    /// Issues a GET against the API and decodes the JSON body
    ///
    /// Fails fast with `MissingCredential` before touching the network.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> FetchResult<T> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response.text().await.map_err(|e| self.classify(e))?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            FetchError::Malformed(format!("{}: {}", path, e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn fetch_category(&self, category: Category) -> FetchResult<Vec<MovieSummary>> {
        let params = Self::category_params(category);
        let list: MovieListResponse = self.get_json(category.path(), &params).await?;

        tracing::debug!(
            category = %category,
            results = list.results.len(),
            provider = "tmdb",
            "Category fetched"
        );

        Ok(list.results)
    }

    async fn fetch_by_id(&self, id: MovieId) -> FetchResult<MovieDetail> {
        let detail: MovieDetail = self.get_json(&format!("/movie/{}", id), &[]).await?;

        tracing::info!(movie_id = id, provider = "tmdb", "Movie details fetched");

        Ok(detail)
    }

    async fn search_remote(&self, query: &str) -> FetchResult<Vec<MovieSummary>> {
        let params = [
            ("query", query.to_string()),
            ("page", FIRST_PAGE.to_string()),
        ];
        let list: MovieListResponse = self.get_json("/search/movie", &params).await?;

        tracing::info!(
            query = %query,
            results = list.results.len(),
            provider = "tmdb",
            "Remote search completed"
        );

        Ok(list.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(api_key: Option<&str>) -> Config {
        let mut vars = vec![("TMDB_API_URL".to_string(), "http://test.local/3/".to_string())];
        if let Some(key) = api_key {
            vars.push(("TMDB_API_KEY".to_string(), key.to_string()));
        }
        envy::from_iter(vars).unwrap()
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = TmdbProvider::new(&create_test_config(Some("k"))).unwrap();
        assert_eq!(provider.api_url, "http://test.local/3");
        assert_eq!(provider.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let provider = TmdbProvider::new(&create_test_config(Some("   "))).unwrap();
        assert!(matches!(
            provider.api_key(),
            Err(FetchError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn test_network_errors_do_not_expose_api_key() {
        let vars = vec![
            ("TMDB_API_URL".to_string(), "http://127.0.0.1:1/3".to_string()),
            ("TMDB_API_KEY".to_string(), "SUPERSECRETKEY".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        let provider = TmdbProvider::new(&config).unwrap();

        let err = provider.fetch_by_id(949).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));

        let response = axum::response::IntoResponse::into_response(crate::error::AppError::from(err));
        assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Network error"));
        assert!(!body.contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let provider = TmdbProvider::new(&create_test_config(None)).unwrap();

        let category = provider.fetch_category(Category::Popular).await;
        assert!(matches!(category, Err(FetchError::MissingCredential)));

        let search = provider.search_remote("heat").await;
        assert!(matches!(search, Err(FetchError::MissingCredential)));

        let detail = provider.fetch_by_id(949).await;
        assert!(matches!(detail, Err(FetchError::MissingCredential)));
    }

    #[test]
    fn test_category_params_plain_list() {
        let params = TmdbProvider::category_params(Category::TopRated);
        assert_eq!(params, vec![("page", "1".to_string())]);
    }

    #[test]
    fn test_category_params_discover_genre() {
        let params = TmdbProvider::category_params(Category::Comedy);
        assert!(params.contains(&("with_genres", "35".to_string())));
        assert!(params.contains(&("sort_by", "popularity.desc".to_string())));
    }

    #[test]
    fn test_image_urls() {
        let images = ImageUrls::new(&create_test_config(None));
        assert_eq!(images.poster("/abc.jpg"), "https://image.tmdb.org/t/p/w500/abc.jpg");
        assert_eq!(
            images.backdrop("/abc.jpg"),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
        assert_eq!(
            images.sized("/abc.jpg", "w185"),
            "https://image.tmdb.org/t/p/w185/abc.jpg"
        );
    }
}
