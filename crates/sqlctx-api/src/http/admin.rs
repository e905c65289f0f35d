//! Admin endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use sqlctx_config::ConfigLoader;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    /// Named domains in the new table.
    pub domains: usize,
    pub source: String,
}

/// Re-read the config file and swap in its domain table.
///
/// Only `[domains]` is applied. An invalid file leaves the current table in
/// place.
pub async fn reload_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    state.increment_requests();

    let path = state.config_path().ok_or(ApiError::ReloadUnsupported)?;
    let config = ConfigLoader::load(path)?;
    let domains = state.retriever().domains().reload(&config)?;
    state.record_reload();

    info!(path = %path.display(), domains, "Domain table reloaded over HTTP");

    Ok(Json(ReloadResponse {
        status: "ok".to_string(),
        domains,
        source: path.display().to_string(),
    }))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
