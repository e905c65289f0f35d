//! # sqlctx Protocols
//!
//! Contracts between the retrieval core and its collaborators.
//! Contains only interface definitions and plain record types - no
//! implementations.
//!
//! ## Core Traits
//!
//! - [`EmbeddingProvider`] - Turns text into vectors for one of two spaces
//! - [`VectorStore`] - Nearest-neighbour search over the logic and schema collections
//! - [`MetadataStore`] - Authoritative logic and schema documents

pub mod embedding;
pub mod error;
pub mod records;
pub mod store;
pub mod types;

pub use embedding::{Embedding, EmbeddingProvider, EmbeddingSpace};
pub use error::{EmbeddingError, StoreError};
pub use records::{ColumnInfo, JoinInfo, LogicRecord, SchemaRecord};
pub use store::{CollectionCounts, MetadataFilter, MetadataStore, VectorHit, VectorStore};
pub use types::*;
