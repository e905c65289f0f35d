//! Embedding provider backed by an OpenAI-compatible `/embeddings` endpoint.
//!
//! Logic examples and schema descriptions may use different models; the
//! provider picks the model by [`EmbeddingSpace`](sqlctx_protocols::EmbeddingSpace).

mod api;
mod provider;

pub use provider::{OpenAIEmbedding, DEFAULT_BASE_URL};
