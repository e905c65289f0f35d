//! Domain and retrieval configuration types.

use serde::{Deserialize, Serialize};

/// Name of the fallback domain.
pub const DEFAULT_DOMAIN: &str = "default";

/// Retrieval parameters of one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainSettings {
    /// Maximum vector distance for logic examples (0.0 - 1.0).
    #[serde(default = "default_logic_threshold")]
    pub logic_distance_threshold: f32,

    /// Maximum vector distance for schema descriptions (0.0 - 1.0).
    #[serde(default = "default_schema_threshold")]
    pub schema_distance_threshold: f32,

    /// Logic examples to return. Zero disables the logic-driven path.
    #[serde(default = "default_max_logics")]
    pub max_logics: usize,

    /// Schemas to return, auto-joined tables included.
    #[serde(default = "default_max_schemas")]
    pub max_schemas: usize,

    /// Weight of the keyword-overlap boost.
    #[serde(default = "default_keyword_boost")]
    pub keyword_boost_weight: f32,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            logic_distance_threshold: default_logic_threshold(),
            schema_distance_threshold: default_schema_threshold(),
            max_logics: default_max_logics(),
            max_schemas: default_max_schemas(),
            keyword_boost_weight: default_keyword_boost(),
        }
    }
}

fn default_logic_threshold() -> f32 {
    0.4
}

fn default_schema_threshold() -> f32 {
    0.5
}

fn default_max_logics() -> usize {
    3
}

fn default_max_schemas() -> usize {
    8
}

fn default_keyword_boost() -> f32 {
    0.1
}

/// Retrieval engine settings shared by all domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default)]
    pub auto_join: AutoJoinConfig,

    /// Restrict vector searches to the requested domain's records.
    #[serde(default = "default_filter_by_domain")]
    pub filter_by_domain: bool,

    /// Per-request deadline in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            auto_join: AutoJoinConfig::default(),
            filter_by_domain: default_filter_by_domain(),
            timeout_ms: None,
        }
    }
}

fn default_filter_by_domain() -> bool {
    true
}

/// Foreign-key expansion bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoJoinConfig {
    #[serde(default = "default_auto_join_enabled")]
    pub enabled: bool,

    /// Join levels to traverse from the seed tables.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for AutoJoinConfig {
    fn default() -> Self {
        Self {
            enabled: default_auto_join_enabled(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_auto_join_enabled() -> bool {
    true
}

fn default_max_depth() -> usize {
    1
}
