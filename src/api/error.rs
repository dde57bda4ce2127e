use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::clients::itunes::CatalogError;
use crate::services::SearchError;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    DatabaseError(String),

    CatalogTimeout(String),

    CatalogUpstream(String),

    CatalogMalformed(String),

    QueryRecording(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::CatalogTimeout(msg) => write!(f, "Catalog timeout: {}", msg),
            ApiError::CatalogUpstream(msg) => write!(f, "Catalog error: {}", msg),
            ApiError::CatalogMalformed(msg) => write!(f, "Catalog response error: {}", msg),
            ApiError::QueryRecording(msg) => write!(f, "Query recording error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::CatalogTimeout(msg) => {
                tracing::warn!("Catalog timeout: {}", msg);
                (StatusCode::GATEWAY_TIMEOUT, msg.clone())
            }
            ApiError::CatalogUpstream(msg) => {
                tracing::warn!("Catalog upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::CatalogMalformed(msg) => {
                tracing::warn!("Catalog malformed response: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::QueryRecording(detail) => {
                tracing::error!("Failed to create search query: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create search query".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::EmptyTerm => ApiError::ValidationError(err.to_string()),
            CatalogError::Timeout => ApiError::CatalogTimeout(err.to_string()),
            CatalogError::Upstream { message } => ApiError::CatalogUpstream(message),
            CatalogError::Malformed { message } => ApiError::CatalogMalformed(message),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Catalog(catalog) => catalog.into(),
            SearchError::Database(msg) => ApiError::DatabaseError(msg),
            SearchError::RecordQuery(detail) => ApiError::QueryRecording(detail),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
