//! Breadth-first foreign-key expansion.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use parking_lot::Mutex;
use tracing::{debug, warn};

use sqlctx_protocols::{MetadataStore, SchemaRecord};

use crate::error::{Phase, RetrievalError};

/// Source of schema records during expansion.
#[async_trait]
pub trait SchemaLookup: Send + Sync {
    async fn lookup(&self, table: &str) -> Result<Option<SchemaRecord>, RetrievalError>;
}

/// Fixed set of already-fetched schema records.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    records: HashMap<String, SchemaRecord>,
}

impl SchemaSnapshot {
    pub fn new(records: HashMap<String, SchemaRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, table: &str) -> Option<&SchemaRecord> {
        self.records.get(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SchemaRecord> for SchemaSnapshot {
    fn from_iter<I: IntoIterator<Item = SchemaRecord>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|record| (record.table_name.clone(), record))
                .collect(),
        )
    }
}

#[async_trait]
impl SchemaLookup for SchemaSnapshot {
    async fn lookup(&self, table: &str) -> Result<Option<SchemaRecord>, RetrievalError> {
        Ok(self.records.get(table).cloned())
    }
}

/// Metadata-store lookup that remembers every record it fetched.
pub(crate) struct StoreLookup {
    store: Arc<dyn MetadataStore>,
    phase: Phase,
    fetched: Mutex<HashMap<String, SchemaRecord>>,
}

impl StoreLookup {
    pub(crate) fn new(store: Arc<dyn MetadataStore>, phase: Phase) -> Self {
        Self {
            store,
            phase,
            fetched: Mutex::new(HashMap::new()),
        }
    }

    /// Everything fetched so far.
    pub(crate) fn snapshot(&self) -> SchemaSnapshot {
        SchemaSnapshot::new(self.fetched.lock().clone())
    }
}

#[async_trait]
impl SchemaLookup for StoreLookup {
    async fn lookup(&self, table: &str) -> Result<Option<SchemaRecord>, RetrievalError> {
        let cached = self.fetched.lock().get(table).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        let record = self
            .store
            .get_schema(table)
            .await
            .map_err(|e| RetrievalError::metadata_store(self.phase, e))?;

        match &record {
            Some(record) => {
                self.fetched
                    .lock()
                    .insert(table.to_string(), record.clone());
            }
            None => warn!(table, "No schema record for referenced table"),
        }
        Ok(record)
    }
}

/// Tables reached by an expansion, plus the records found for them.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Seeds first, then each level in lexical order.
    pub tables: Vec<String>,
    pub records: HashMap<String, SchemaRecord>,
}

impl Expansion {
    /// Records in table order, skipping tables without one.
    pub fn records_in_order(&self) -> impl Iterator<Item = &SchemaRecord> {
        self.tables.iter().filter_map(|t| self.records.get(t))
    }

    pub fn record_count(&self) -> usize {
        self.records_in_order().count()
    }
}

/// Expands seed tables through the join graph.
pub struct AutoJoinExpander<'a> {
    lookup: &'a dyn SchemaLookup,
}

impl<'a> AutoJoinExpander<'a> {
    pub fn new(lookup: &'a dyn SchemaLookup) -> Self {
        Self { lookup }
    }

    /// Visit `seeds` and then up to `max_depth` join levels, never
    /// collecting more than `max_total` tables.
    ///
    /// Tables without a schema record stay in the result but cannot be
    /// expanded further. Cycles are cut by the visited set.
    pub async fn expand(
        &self,
        seeds: &[String],
        max_depth: usize,
        max_total: usize,
    ) -> Result<Expansion, RetrievalError> {
        let mut visited = HashSet::new();
        let mut tables = Vec::new();
        for seed in seeds {
            if tables.len() >= max_total {
                break;
            }
            if visited.insert(seed.clone()) {
                tables.push(seed.clone());
            }
        }

        let mut records = HashMap::new();
        let mut frontier = tables.clone();
        let mut depth = 0;

        while !frontier.is_empty() {
            let found = try_join_all(frontier.iter().map(|t| self.lookup.lookup(t))).await?;

            let mut discovered = BTreeSet::new();
            for (table, record) in frontier.iter().zip(found) {
                if let Some(record) = record {
                    discovered.extend(
                        record
                            .join_targets()
                            .into_iter()
                            .filter(|t| !visited.contains(*t))
                            .map(str::to_string),
                    );
                    records.insert(table.clone(), record);
                }
            }

            if depth >= max_depth || tables.len() >= max_total {
                break;
            }

            let mut next = Vec::new();
            for table in discovered {
                if tables.len() >= max_total {
                    break;
                }
                visited.insert(table.clone());
                tables.push(table.clone());
                next.push(table);
            }

            depth += 1;
            debug!(depth, added = next.len(), "Expanded join level");
            frontier = next;
        }

        Ok(Expansion { tables, records })
    }
}

#[cfg(test)]
#[path = "expander_tests.rs"]
mod tests;
