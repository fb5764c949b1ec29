//! Error handling for the Vibelist API
//!
//! One error type for every handler, with status code mapping via axum's
//! `IntoResponse`. Pipeline failures keep their own kind as the response
//! `code` and their diagnostic payload as `details`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vibelist_gemini_client::GeminiError;
use vibelist_spotify_client::SpotifyError;

use crate::recommendations::RecommendationError;
use crate::repositories::StoreError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Missing Spotify access token
    #[error("authentication required")]
    Unauthorized,

    /// Spotify rejected the access token
    #[error("invalid authentication token: {0}")]
    InvalidToken(String),

    // ========== Resource Errors ==========
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Validation Errors ==========
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid query parameter '{name}': {reason}")]
    InvalidQueryParam { name: &'static str, reason: String },

    // ========== Database Errors ==========
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== External Service Errors ==========
    /// Spotify call failed outside the pipeline
    #[error("catalog service error: {0}")]
    CatalogService(String),

    /// Gemini call failed outside the pipeline
    #[error("generator service error: {0}")]
    GeneratorService(String),

    #[error("rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    // ========== Pipeline ==========
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),

    // ========== Internal Errors ==========
    #[error("internal server error: {0}")]
    Internal(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::Unauthorized | Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            Self::NotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict { .. } => StatusCode::CONFLICT,

            // 400 Bad Request
            Self::ValidationError(_)
            | Self::InvalidBody(_)
            | Self::MissingField(_)
            | Self::InvalidQueryParam { .. } => StatusCode::BAD_REQUEST,

            // 422 Unprocessable Entity
            Self::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 429 Too Many Requests
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 502 Bad Gateway (external service errors)
            Self::CatalogService(_) | Self::GeneratorService(_) => StatusCode::BAD_GATEWAY,

            Self::Recommendation(err) => recommendation_status(err),

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidQueryParam { .. } => "INVALID_QUERY_PARAM",
            Self::Database(_) => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::CatalogService(_) => "CATALOG_SERVICE_ERROR",
            Self::GeneratorService(_) => "GENERATOR_SERVICE_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Recommendation(err) => err.kind(),
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Structured payload attached to the response body
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Recommendation(err) => err.details(),
            _ => None,
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type,
            id: id.into(),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

fn recommendation_status(err: &RecommendationError) -> StatusCode {
    match err {
        RecommendationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RecommendationError::UserNotFound { .. } => StatusCode::NOT_FOUND,
        RecommendationError::MalformedRecommendation { .. }
        | RecommendationError::NoResolvableTracks { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RecommendationError::UpstreamUnavailable(_)
        | RecommendationError::GeneratorError(_)
        | RecommendationError::PlaylistCreationFailed(_)
        | RecommendationError::TrackAdditionFailed { .. } => StatusCode::BAD_GATEWAY,
        RecommendationError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
            details: self.details(),
        };

        // For rate limiting, add Retry-After header
        if let Self::RateLimited { retry_after } = &self {
            return (
                status,
                [("Retry-After", retry_after.to_string())],
                Json(error_response),
            )
                .into_response();
        }

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingReference(resource_type) => {
                Self::not_found(resource_type, "referenced id")
            }
            StoreError::Conflict(message) => Self::conflict("record", message),
            StoreError::Unavailable(_) => Self::DatabaseUnavailable,
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl From<SpotifyError> for ApiError {
    fn from(err: SpotifyError) -> Self {
        match err {
            SpotifyError::Unauthorized(message) => Self::InvalidToken(message),
            SpotifyError::RateLimited { retry_after } => Self::RateLimited {
                retry_after: retry_after.unwrap_or(1),
            },
            SpotifyError::InvalidInput(message) => Self::ValidationError(message),
            other => Self::CatalogService(other.to_string()),
        }
    }
}

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        Self::GeneratorService(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}
