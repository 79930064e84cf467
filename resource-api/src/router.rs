use std::future::ready;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::prometheus::track_metrics;
use crate::service::ResourceService;

#[derive(Clone)]
pub struct AppState {
    pub service: ResourceService,
}

pub fn router(service: ResourceService, metrics: Option<PrometheusHandle>) -> Router {
    let state = AppState { service };

    // Known paths answer other methods with the same 404 as unknown paths.
    let router = Router::new()
        .route(
            "/",
            get(handlers::index).fallback(handlers::route_not_found),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::route_not_found),
        )
        .route(
            "/_liveness",
            get(handlers::liveness).fallback(handlers::route_not_found),
        )
        .route(
            "/_readiness",
            get(handlers::readiness).fallback(handlers::route_not_found),
        )
        .route(
            "/resources",
            get(handlers::list_resources).fallback(handlers::route_not_found),
        )
        .route(
            "/resources/:id",
            get(handlers::get_resource).fallback(handlers::route_not_found),
        )
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state);

    // Only expose metrics when a recorder was installed for this process.
    match metrics {
        Some(recorder_handle) => {
            router.route("/metrics", get(move || ready(recorder_handle.render())))
        }
        None => router,
    }
}
