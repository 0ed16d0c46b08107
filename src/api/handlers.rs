use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{Category, MovieDetail, MovieId, MovieSummary, WatchListEntry},
    services::movie_search::{SearchMode, SearchResponse},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub count: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// How long a built catalog is served before it is rebuilt
    pub ttl_secs: u64,
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: Category,
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub mode: SearchMode,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    #[serde(flatten)]
    pub movie: MovieDetail,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub in_watch_list: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub id: MovieId,
    pub removed: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Aggregated catalog across every category
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let movies = state.catalog.get_aggregated_catalog().await;
    let snapshot = state.catalog.snapshot().await;

    Json(CatalogResponse {
        count: movies.len(),
        refreshed_at: snapshot.refreshed_at,
        ttl_secs: state.catalog.ttl().as_secs(),
        movies: (*movies).clone(),
    })
}

/// One category row, fetched directly
pub async fn get_category(
    State(state): State<AppState>,
    Path(category): Path<Category>,
) -> AppResult<Json<CategoryResponse>> {
    let movies = state.provider.fetch_category(category).await?;
    Ok(Json(CategoryResponse { category, movies }))
}

/// Movie details with resolved image URLs
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<MovieDetailResponse>> {
    let movie = state.provider.fetch_by_id(id).await?;
    let in_watch_list = state.watch_list.contains(id).await?;

    let poster_url = movie
        .summary
        .poster_path
        .as_deref()
        .map(|path| state.images.poster(path));
    let backdrop_url = movie
        .summary
        .backdrop_path
        .as_deref()
        .map(|path| state.images.backdrop(path));

    Ok(Json(MovieDetailResponse {
        movie,
        poster_url,
        backdrop_url,
        in_watch_list,
    }))
}

/// Ranked search over the catalog, or directly against the remote API
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let response = state.search.search(&params.q, params.mode).await?;
    Ok(Json(response))
}

/// Saved movies in insertion order
pub async fn get_watch_list(State(state): State<AppState>) -> AppResult<Json<Vec<WatchListEntry>>> {
    Ok(Json(state.watch_list.list().await?))
}

/// Save a movie; saving it again returns the existing entry
pub async fn add_to_watch_list(
    State(state): State<AppState>,
    Json(movie): Json<MovieSummary>,
) -> AppResult<Json<WatchListEntry>> {
    let entry = state.watch_list.add(movie).await?;
    Ok(Json(entry))
}

/// Remove a movie; removing an unsaved movie is not an error
pub async fn remove_from_watch_list(
    State(state): State<AppState>,
    Path(id): Path<MovieId>,
) -> AppResult<Json<RemoveResponse>> {
    let removed = state.watch_list.remove(id).await?;
    Ok(Json(RemoveResponse { id, removed }))
}
