//! Map-backed metadata store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use sqlctx_protocols::{CollectionCounts, LogicRecord, MetadataStore, SchemaRecord, StoreError};

#[derive(Default)]
pub struct InMemoryMetadataStore {
    logics: RwLock<HashMap<String, LogicRecord>>,
    schemas: RwLock<HashMap<String, SchemaRecord>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a logic record, returning the one it replaced.
    pub fn insert_logic(&self, record: LogicRecord) -> Option<LogicRecord> {
        self.logics.write().insert(record.id.clone(), record)
    }

    /// Store a schema record, returning the one it replaced.
    pub fn insert_schema(&self, record: SchemaRecord) -> Option<SchemaRecord> {
        self.schemas.write().insert(record.table_name.clone(), record)
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get_schema(&self, table_name: &str) -> Result<Option<SchemaRecord>, StoreError> {
        Ok(self.schemas.read().get(table_name).cloned())
    }

    async fn get_logic(&self, id: &str) -> Result<Option<LogicRecord>, StoreError> {
        Ok(self.logics.read().get(id).cloned())
    }

    async fn counts(&self) -> Result<CollectionCounts, StoreError> {
        Ok(CollectionCounts {
            logics: self.logics.read().len(),
            schemas: self.schemas.read().len(),
        })
    }
}
