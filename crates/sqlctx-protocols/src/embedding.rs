//! Embedding provider protocol.
//!
//! The retrieval core embeds the same query twice, once per semantic
//! space, because logic examples and schema descriptions are indexed with
//! independent models.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// The two independent semantic spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingSpace {
    /// Natural-language questions paired with SQL.
    Logic,
    /// Table descriptions.
    Schema,
}

impl EmbeddingSpace {
    pub const ALL: [EmbeddingSpace; 2] = [EmbeddingSpace::Logic, EmbeddingSpace::Schema];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logic => "logic",
            Self::Schema => "schema",
        }
    }
}

impl fmt::Display for EmbeddingSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embedding result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Vector representation.
    pub vector: Vec<f32>,
    /// Dimension of the embedding.
    pub dimension: usize,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        let dimension = vector.len();
        Self { vector, dimension }
    }

    /// Compute cosine similarity with another embedding.
    ///
    /// Returns 0.0 for mismatched dimensions or zero vectors.
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.dimension != other.dimension {
            return 0.0;
        }

        let dot: f32 = self
            .vector
            .iter()
            .zip(other.vector.iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm_a: f32 = self.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.vector.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }

    /// Cosine distance normalised to `[0, 1]` (0 = identical direction).
    pub fn cosine_distance(&self, other: &Self) -> f32 {
        ((1.0 - self.cosine_similarity(other)) / 2.0).clamp(0.0, 1.0)
    }
}

/// Trait for embedding providers.
///
/// Implementations must be deterministic for identical input and model
/// version.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding of `text` in the given space.
    async fn embed(&self, text: &str, space: EmbeddingSpace) -> Result<Embedding, EmbeddingError>;

    /// Embedding dimension of a space.
    fn dimension(&self, space: EmbeddingSpace) -> usize;

    /// Model identifier used for a space.
    fn model_name(&self, space: EmbeddingSpace) -> String;
}

#[cfg(test)]
#[path = "embedding_tests.rs"]
mod tests;
