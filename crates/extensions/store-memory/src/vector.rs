//! Vector store using brute-force search.

use async_trait::async_trait;
use parking_lot::RwLock;

use sqlctx_protocols::{
    Embedding, EmbeddingSpace, Metadata, MetadataFilter, StoreError, VectorHit, VectorStore,
};

struct Entry {
    id: String,
    embedding: Embedding,
    metadata: Metadata,
}

/// Two insertion-ordered collections searched by cosine distance.
///
/// Hits at equal distance come back in insertion order.
#[derive(Default)]
pub struct InMemoryVectorStore {
    logic: RwLock<Vec<Entry>>,
    schema: RwLock<Vec<Entry>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, space: EmbeddingSpace) -> &RwLock<Vec<Entry>> {
        match space {
            EmbeddingSpace::Logic => &self.logic,
            EmbeddingSpace::Schema => &self.schema,
        }
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn upsert(
        &self,
        space: EmbeddingSpace,
        id: impl Into<String>,
        embedding: Embedding,
        metadata: Metadata,
    ) -> Result<(), StoreError> {
        let id = id.into();
        let mut entries = self.collection(space).write();

        if let Some(first) = entries.first() {
            if first.embedding.dimension != embedding.dimension {
                return Err(StoreError::QueryError(format!(
                    "{} collection holds {}-dimensional vectors, got {} for '{}'",
                    space, first.embedding.dimension, embedding.dimension, id
                )));
            }
        }

        let entry = Entry {
            id,
            embedding,
            metadata,
        };
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    pub fn remove(&self, space: EmbeddingSpace, id: &str) -> bool {
        let mut entries = self.collection(space).write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    pub fn len(&self, space: EmbeddingSpace) -> usize {
        self.collection(space).read().len()
    }

    pub fn is_empty(&self) -> bool {
        EmbeddingSpace::ALL.iter().all(|s| self.len(*s) == 0)
    }

    pub fn clear(&self) {
        self.logic.write().clear();
        self.schema.write().clear();
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query(
        &self,
        space: EmbeddingSpace,
        vector: &Embedding,
        max_distance: f32,
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<VectorHit>, StoreError> {
        let entries = self.collection(space).read();

        let mut hits = Vec::new();
        for entry in entries.iter() {
            if entry.embedding.dimension != vector.dimension {
                return Err(StoreError::QueryError(format!(
                    "query has {} dimensions, {} collection has {}",
                    vector.dimension, space, entry.embedding.dimension
                )));
            }
            if filter.is_some_and(|f| !f.matches(&entry.metadata)) {
                continue;
            }
            let distance = vector.cosine_distance(&entry.embedding);
            if distance <= max_distance {
                hits.push(VectorHit {
                    id: entry.id.clone(),
                    distance,
                    metadata: entry.metadata.clone(),
                });
            }
        }

        // Stable sort keeps insertion order among ties.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
#[path = "vector_tests.rs"]
mod tests;
