use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::{ApiError, HealthResponse, IndexResponse, ItemResponse, ListResponse};
use crate::query::ResourceFilters;
use crate::router::AppState;

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse::default())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::now())
}

pub async fn liveness() -> &'static str {
    "crisis resources api"
}

pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.service.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("readiness check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn list_resources(
    State(state): State<AppState>,
    query: Result<Query<ResourceFilters>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(filters) = query.map_err(ApiError::InvalidFilters)?;
    let resources = state
        .service
        .list(&filters)
        .await
        .map_err(ApiError::ListFailed)?;

    Ok(Json(ListResponse::new(resources, filters)))
}

pub async fn get_resource(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    // An id that can't be decoded can't name a resource either.
    let Path(id) = path.map_err(|_| ApiError::NotFound)?;
    let resource = state.service.get_by_id(&id).await?;

    Ok(Json(ItemResponse::new(resource)))
}

/// Plain-text 404 for any path or method without a handler.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, String) {
    let requested = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    (
        StatusCode::NOT_FOUND,
        format!("Route \"{requested}\" not found. Please enter the correct endpoint."),
    )
}
