//! JSON catalog of logic and schema records.
//!
//! ```json
//! {
//!   "logics": [{"id": "...", "natural_query": "...", "sql_query": "...",
//!               "tables": ["..."], "domain_tags": ["..."]}],
//!   "schemas": [{"table_name": "...", "description": "...",
//!                "columns": [{"name": "...", "type": "...", "description": "..."}],
//!                "joins": [{"target_table": "...", "join_condition": "..."}],
//!                "domain_tags": ["..."]}]
//! }
//! ```

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use sqlctx_protocols::{
    EmbeddingError, EmbeddingProvider, EmbeddingSpace, LogicRecord, Metadata, SchemaRecord,
    StoreError, DOMAIN_TAGS_KEY,
};

use crate::metadata::InMemoryMetadataStore;
use crate::vector::InMemoryVectorStore;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Indexing failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Indexing failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default)]
    pub logics: Vec<LogicRecord>,

    #[serde(default)]
    pub schemas: Vec<SchemaRecord>,
}

/// Stores filled from a catalog.
pub struct CatalogStores {
    pub vectors: InMemoryVectorStore,
    pub metadata: InMemoryMetadataStore,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(content)?;
        catalog.normalize()?;
        Ok(catalog)
    }

    /// Reject blank or repeated keys and clean up per-record fields.
    fn normalize(&mut self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for logic in &mut self.logics {
            if logic.id.trim().is_empty() {
                return Err(CatalogError::Invalid("logic with empty id".to_string()));
            }
            if !ids.insert(logic.id.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate logic id '{}'",
                    logic.id
                )));
            }
            logic.dedup_tables();
            logic.embedding_distance = None;
        }

        let mut tables = HashSet::new();
        for schema in &self.schemas {
            if schema.table_name.trim().is_empty() {
                return Err(CatalogError::Invalid("schema with empty table_name".to_string()));
            }
            if !tables.insert(schema.table_name.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate schema for table '{}'",
                    schema.table_name
                )));
            }
        }
        Ok(())
    }

    /// Embed every record and load both stores.
    pub async fn into_stores(
        self,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<CatalogStores, CatalogError> {
        let vectors = InMemoryVectorStore::new();
        let metadata = InMemoryMetadataStore::new();

        let logic_vectors = try_join_all(self.logics.iter().map(|l| {
            let text = logic_text(l);
            async move { embedder.embed(&text, EmbeddingSpace::Logic).await }
        }))
        .await?;
        let schema_vectors = try_join_all(self.schemas.iter().map(|s| {
            let text = schema_text(s);
            async move { embedder.embed(&text, EmbeddingSpace::Schema).await }
        }))
        .await?;

        for (logic, embedding) in self.logics.into_iter().zip(logic_vectors) {
            vectors.upsert(
                EmbeddingSpace::Logic,
                logic.id.clone(),
                embedding,
                tag_metadata(&logic.domain_tags),
            )?;
            metadata.insert_logic(logic);
        }
        for (schema, embedding) in self.schemas.into_iter().zip(schema_vectors) {
            vectors.upsert(
                EmbeddingSpace::Schema,
                schema.table_name.clone(),
                embedding,
                tag_metadata(&schema.domain_tags),
            )?;
            metadata.insert_schema(schema);
        }

        info!(
            logics = vectors.len(EmbeddingSpace::Logic),
            schemas = vectors.len(EmbeddingSpace::Schema),
            "Catalog indexed"
        );
        Ok(CatalogStores { vectors, metadata })
    }

    /// Every domain tag used by any record.
    pub fn domain_tags(&self) -> BTreeSet<String> {
        self.logics
            .iter()
            .flat_map(|l| l.domain_tags.iter())
            .chain(self.schemas.iter().flat_map(|s| s.domain_tags.iter()))
            .cloned()
            .collect()
    }
}

/// Text indexed for a logic example.
pub fn logic_text(record: &LogicRecord) -> String {
    record.natural_query.clone()
}

/// Text indexed for a table: name, description and columns.
pub fn schema_text(record: &SchemaRecord) -> String {
    let mut text = format!("{} {}", record.table_name, record.description);
    for column in &record.columns {
        text.push(' ');
        text.push_str(&column.name);
        if !column.description.is_empty() {
            text.push(' ');
            text.push_str(&column.description);
        }
    }
    text
}

fn tag_metadata(tags: &BTreeSet<String>) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(
        DOMAIN_TAGS_KEY.to_string(),
        serde_json::Value::Array(
            tags.iter()
                .map(|t| serde_json::Value::String(t.clone()))
                .collect(),
        ),
    );
    metadata
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
