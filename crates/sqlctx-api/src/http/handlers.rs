//! Retrieval handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sqlctx_core::{DomainConfig, RetrievalRequest, RetrievalResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Service information returned at the root path.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// A configured domain and its parameters.
#[derive(Debug, Serialize, Deserialize)]
pub struct DomainEntry {
    pub name: String,
    #[serde(flatten)]
    pub config: DomainConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DomainsResponse {
    pub domains: Vec<DomainEntry>,
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: [
            "POST /api/v1/search",
            "GET /api/v1/domains",
            "GET /api/v1/health",
            "POST /api/v1/admin/reload",
            "GET /metrics",
        ]
        .iter()
        .map(|e| e.to_string())
        .collect(),
    })
}

/// Run one retrieval.
///
/// Malformed bodies and failed validation are reported as 400, collaborator
/// failures and deadline expiry as 503.
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RetrievalRequest>, JsonRejection>,
) -> Result<Json<RetrievalResult>, ApiError> {
    state.increment_requests();

    let Json(request) = payload.inspect_err(|_| state.record_rejected())?;
    debug!(query = %request.query, domain = ?request.domain, "Search request");

    let outcome = state.retriever().retrieve(request).await;
    state.record_search(&outcome);
    Ok(Json(outcome?))
}

pub async fn list_domains(State(state): State<Arc<AppState>>) -> Json<DomainsResponse> {
    state.increment_requests();

    let domains = state
        .retriever()
        .list_domains()
        .into_iter()
        .map(|(name, config)| DomainEntry { name, config })
        .collect();
    Json(DomainsResponse { domains })
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
