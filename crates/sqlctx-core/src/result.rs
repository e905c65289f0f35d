//! Retrieval result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use sqlctx_protocols::{LogicRecord, SchemaRecord};

/// Which retrieval path produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Schemas came from the tables of matching logic examples.
    LogicDriven,
    /// No logic example matched; schemas came from direct search.
    SchemaOnly,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogicDriven => "logic_driven",
            Self::SchemaOnly => "schema_only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub strategy: Strategy,

    /// Domain whose configuration produced the final selection.
    pub domain: String,

    /// Ranked best first, each carrying its embedding distance.
    pub logics: Vec<LogicRecord>,

    /// No two entries share a table name.
    pub schemas: Vec<SchemaRecord>,

    pub detected_domains: BTreeSet<String>,

    /// Every table touched during retrieval, including tables whose schema
    /// record was missing.
    pub referenced_tables: BTreeSet<String>,

    pub processing_time_ms: f64,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.logics.is_empty() && self.schemas.is_empty()
    }
}
