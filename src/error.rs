use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures at the remote catalog boundary
///
/// Every variant is recoverable by the aggregation cache (the category simply
/// contributes nothing); callers that hit the provider directly get it converted
/// into an [`AppError`].
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("TMDB API key is missing; set TMDB_API_KEY")]
    MissingCredential,

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("Fetch task aborted: {0}")]
    Aborted(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::MissingCredential => AppError::MissingCredential(err.to_string()),
            FetchError::Timeout(_) => AppError::UpstreamTimeout(err.to_string()),
            FetchError::Status { status: 404, .. } => AppError::NotFound(err.to_string()),
            FetchError::Network(ref e) if e.is_timeout() => {
                AppError::UpstreamTimeout(err.to_string())
            }
            FetchError::Network(_) | FetchError::Status { .. } | FetchError::Malformed(_) => {
                AppError::ExternalApi(err.to_string())
            }
            FetchError::Aborted(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MissingCredential(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::UpstreamTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_credential_maps_to_service_unavailable() {
        let err = AppError::from(FetchError::MissingCredential);
        assert!(matches!(err, AppError::MissingCredential(_)));
        assert!(err.to_string().contains("TMDB_API_KEY"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_upstream_404_maps_to_not_found() {
        let err = AppError::from(FetchError::Status {
            status: 404,
            body: "{}".to_string(),
        });
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_upstream_500_maps_to_bad_gateway() {
        let err = AppError::from(FetchError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = AppError::from(FetchError::Timeout(Duration::from_secs(10)));
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_malformed_maps_to_bad_gateway() {
        let err = AppError::from(FetchError::Malformed("expected `results`".to_string()));
        assert!(matches!(err, AppError::ExternalApi(_)));
    }
}
