//! API error types.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use sqlctx_config::ConfigError;
use sqlctx_core::{ErrorKind, RetrievalError};

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// A collaborator failed or the deadline passed.
    #[error("{0}")]
    Unavailable(String),

    /// The server was started without a config file to reload from.
    #[error("no configuration file to reload")]
    ReloadUnsupported,

    /// Reloading the configuration failed.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ReloadUnsupported => StatusCode::CONFLICT,
            Self::Config(ConfigError::InvalidValue { .. } | ConfigError::TomlParse(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "invalid_request",
            Self::Unavailable(_) => "dependency_unavailable",
            Self::ReloadUnsupported => "reload_unsupported",
            Self::Config(_) => "config_error",
        }
    }
}

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        match err.kind() {
            ErrorKind::InvalidRequest => Self::BadRequest(err.to_string()),
            ErrorKind::DependencyUnavailable => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    /// RFC 3339 time the error was produced.
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), "{}", self);
        } else {
            warn!(code = self.code(), "{}", self);
        }
        (status, Json(ErrorResponse::new(self.code(), self.to_string()))).into_response()
    }
}
