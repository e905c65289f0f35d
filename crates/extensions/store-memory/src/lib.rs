//! In-memory collaborators for the retrieval core.
//!
//! Provides:
//! - Brute-force cosine search over the logic and schema collections
//! - A map-backed metadata store
//! - A feature-hashing embedding provider that needs no model
//! - A JSON catalog that fills both stores at startup

mod catalog;
mod embedding;
mod metadata;
mod vector;

pub use catalog::{logic_text, schema_text, Catalog, CatalogError, CatalogStores};
pub use embedding::HashEmbedding;
pub use metadata::InMemoryMetadataStore;
pub use vector::InMemoryVectorStore;
