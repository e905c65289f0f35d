//! Vector store and metadata store protocol definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::embedding::{Embedding, EmbeddingSpace};
use crate::error::StoreError;
use crate::records::{LogicRecord, SchemaRecord};
use crate::types::Metadata;

/// One nearest-neighbour match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorHit {
    /// Logic id or table name, depending on the collection.
    pub id: String,
    /// Normalised distance in `[0, 1]`, smaller is closer.
    pub distance: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorHit {
    pub fn new(id: impl Into<String>, distance: f32) -> Self {
        Self {
            id: id.into(),
            distance,
            metadata: Metadata::new(),
        }
    }
}

/// Filter on a metadata field.
///
/// A string field matches when equal to `value`; an array field matches
/// when it contains `value`. Entries where the field is absent, null or an
/// empty array are shared and always match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    pub value: String,
}

impl MetadataFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        match metadata.get(&self.key) {
            None | Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(s)) => s == &self.value,
            Some(serde_json::Value::Array(items)) => {
                items.is_empty() || items.iter().any(|v| v.as_str() == Some(self.value.as_str()))
            }
            Some(_) => false,
        }
    }
}

/// Nearest-neighbour search over the two collections.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns hits with `distance <= max_distance`, at most `limit`,
    /// ascending by distance. Ties keep the store's internal order.
    async fn query(
        &self,
        space: EmbeddingSpace,
        vector: &Embedding,
        max_distance: f32,
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorHit>, StoreError>;
}

/// Number of documents per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub logics: usize,
    pub schemas: usize,
}

/// Authoritative logic and schema documents.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Look up a table's schema record.
    async fn get_schema(&self, table_name: &str) -> Result<Option<SchemaRecord>, StoreError>;

    /// Look up a logic record by id.
    async fn get_logic(&self, id: &str) -> Result<Option<LogicRecord>, StoreError>;

    /// Collection sizes, for introspection.
    async fn counts(&self) -> Result<CollectionCounts, StoreError>;
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
