//! Embedding and logging configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider type ("hash" or "openai").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Vector dimension, shared by both spaces.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Model used for logic examples.
    #[serde(default = "default_logic_model")]
    pub logic_model: String,

    /// Model used for schema descriptions.
    #[serde(default = "default_schema_model")]
    pub schema_model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimension: default_dimension(),
            logic_model: default_logic_model(),
            schema_model: default_schema_model(),
            base_url: None,
            api_key: None,
        }
    }
}

fn default_provider() -> String {
    "hash".to_string()
}

fn default_dimension() -> usize {
    256
}

fn default_logic_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_schema_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit console logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Directory for rotated log files. Defaults to `~/.sqlctx/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
