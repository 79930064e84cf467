use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::query::ResourceFilters;
use crate::resources::Resource;
use crate::service::LookupError;
use crate::store::StoreError;

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub status: String,
}

impl Default for IndexResponse {
    fn default() -> Self {
        Self {
            message: "Welcome to CRL Backend API".to_string(),
            status: "Server is running successfully".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Envelope of a successful listing. `count` is always `data.len()`.
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<Resource>,
    pub count: usize,
    pub filters: ResourceFilters,
}

impl ListResponse {
    pub fn new(data: Vec<Resource>, filters: ResourceFilters) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
            filters,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub data: Resource,
}

impl ItemResponse {
    pub fn new(data: Resource) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch resources")]
    ListFailed(#[source] StoreError),
    #[error("Failed to fetch resources")]
    InvalidFilters(#[source] QueryRejection),
    #[error("Failed to fetch resource")]
    LookupFailed(#[source] StoreError),
    #[error("Resource not found")]
    NotFound,
}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::NotFound => ApiError::NotFound,
            LookupError::Store(e) => ApiError::LookupFailed(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ListFailed(_)
            | ApiError::InvalidFilters(_)
            | ApiError::LookupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::ListFailed(e) | ApiError::LookupFailed(e) => {
                error!("{}: {}", self, e);
                Some(e.to_string())
            }
            ApiError::InvalidFilters(e) => {
                error!("{}: {}", self, e);
                Some(e.body_text())
            }
            ApiError::NotFound => None,
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}
