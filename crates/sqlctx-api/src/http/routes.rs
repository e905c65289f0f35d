//! HTTP route definitions.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::http::{admin, handlers, monitoring};
use crate::state::AppState;

/// Create the main router.
///
/// ```text
/// GET  /                     - Service info
/// POST /api/v1/search        - Retrieve logics and schemas for a question
/// GET  /api/v1/domains       - Configured domains
/// GET  /api/v1/health        - Component health
/// POST /api/v1/admin/reload  - Reload the domain table from the config file
/// GET  /metrics              - Prometheus metrics
/// ```
///
/// An empty `allowed_origins` allows any origin.
pub fn create_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/search", post(handlers::search))
        .route("/domains", get(handlers::list_domains))
        .route("/health", get(monitoring::health_check))
        .route("/admin/reload", post(admin::reload_config))
        .with_state(state.clone());

    let metrics_route = Router::new()
        .route("/metrics", get(monitoring::prometheus_metrics))
        .with_state(state);

    Router::new()
        .route("/", get(handlers::service_info))
        .nest("/api/v1", api_routes)
        .merge(metrics_route)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
