//! Monitoring and health check handlers.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use sqlctx_protocols::EmbeddingSpace;

use crate::state::AppState;

// ============================================================================
// Health Check Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    fn new(name: &str, status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Prometheus Metrics Types
// ============================================================================

/// Prometheus metrics response (text format).
#[derive(Debug)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl IntoResponse for PrometheusMetrics {
    fn into_response(self) -> axum::response::Response {
        (
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            self.content,
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health of the metadata store, the embedding provider and the domain table.
///
/// Responds 503 when any component is unhealthy.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let retriever = state.retriever();

    let store = match retriever.metadata().counts().await {
        Ok(counts) if counts.logics == 0 && counts.schemas == 0 => ComponentHealth::new(
            "metadata_store",
            HealthStatus::Degraded,
            "catalog is empty",
        ),
        Ok(counts) => ComponentHealth::new(
            "metadata_store",
            HealthStatus::Healthy,
            format!("{} logics, {} schemas", counts.logics, counts.schemas),
        ),
        Err(e) => ComponentHealth::new("metadata_store", HealthStatus::Unhealthy, e.to_string()),
    };

    let embedder = retriever.embedder();
    let embedding = ComponentHealth::new(
        "embedding",
        HealthStatus::Healthy,
        format!(
            "logic={} schema={}",
            embedder.model_name(EmbeddingSpace::Logic),
            embedder.model_name(EmbeddingSpace::Schema)
        ),
    );

    let domains = ComponentHealth::new(
        "domains",
        HealthStatus::Healthy,
        format!("{} named", retriever.domains().len()),
    );

    let components = vec![store, embedding, domains];

    let overall_status = if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if components.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let code = match overall_status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (
        code,
        Json(HealthResponse {
            status: overall_status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.uptime().as_secs(),
            components,
        }),
    )
}

/// Prometheus metrics endpoint.
pub async fn prometheus_metrics(State(state): State<Arc<AppState>>) -> PrometheusMetrics {
    let retriever = state.retriever();
    let stats = state.search_stats();
    let embedder = retriever.embedder();

    let mut content = format!(
        r#"# HELP sqlctx_up Whether the sqlctx service is up
# TYPE sqlctx_up gauge
sqlctx_up 1

# HELP sqlctx_uptime_seconds Uptime in seconds
# TYPE sqlctx_uptime_seconds counter
sqlctx_uptime_seconds {}

# HELP sqlctx_info Service information
# TYPE sqlctx_info gauge
sqlctx_info{{version="{}"}} 1

# HELP sqlctx_http_requests_total Total API requests
# TYPE sqlctx_http_requests_total counter
sqlctx_http_requests_total {}

# HELP sqlctx_searches_total Completed searches by strategy
# TYPE sqlctx_searches_total counter
sqlctx_searches_total{{strategy="logic_driven"}} {}
sqlctx_searches_total{{strategy="schema_only"}} {}

# HELP sqlctx_search_errors_total Failed searches by error kind
# TYPE sqlctx_search_errors_total counter
sqlctx_search_errors_total{{kind="invalid_request"}} {}
sqlctx_search_errors_total{{kind="dependency_unavailable"}} {}

# HELP sqlctx_config_reloads_total Successful domain table reloads
# TYPE sqlctx_config_reloads_total counter
sqlctx_config_reloads_total {}

# HELP sqlctx_domains_configured Named domains in addition to the default
# TYPE sqlctx_domains_configured gauge
sqlctx_domains_configured {}

# HELP sqlctx_embedding_model_info Embedding model per space
# TYPE sqlctx_embedding_model_info gauge
sqlctx_embedding_model_info{{space="logic",model="{}",dimension="{}"}} 1
sqlctx_embedding_model_info{{space="schema",model="{}",dimension="{}"}} 1
"#,
        state.uptime().as_secs(),
        env!("CARGO_PKG_VERSION"),
        state.request_count(),
        stats.logic_driven,
        stats.schema_only,
        stats.invalid_requests,
        stats.dependency_failures,
        state.reload_count(),
        retriever.domains().len(),
        embedder.model_name(EmbeddingSpace::Logic),
        embedder.dimension(EmbeddingSpace::Logic),
        embedder.model_name(EmbeddingSpace::Schema),
        embedder.dimension(EmbeddingSpace::Schema),
    );

    // Store sizes are omitted while the store is unreachable.
    if let Ok(counts) = retriever.metadata().counts().await {
        let _ = write!(
            content,
            r#"
# HELP sqlctx_collection_documents Documents per collection
# TYPE sqlctx_collection_documents gauge
sqlctx_collection_documents{{collection="logics"}} {}
sqlctx_collection_documents{{collection="schemas"}} {}
"#,
            counts.logics, counts.schemas
        );
    }

    PrometheusMetrics { content }
}

#[cfg(test)]
#[path = "monitoring_tests.rs"]
mod tests;
