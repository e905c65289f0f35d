//! Feature-hashing embedding provider.

use async_trait::async_trait;

use sqlctx_protocols::{Embedding, EmbeddingError, EmbeddingProvider, EmbeddingSpace};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Bag-of-words embedding built by hashing each word into a bucket.
///
/// Not semantic: texts only land close together when they share words.
/// Deterministic across runs and platforms, which makes it suitable for
/// tests and for catalogs small enough to not need a model.
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];

        for word in words(text) {
            let hash = fnv1a(word.as_bytes());
            let idx = (hash % self.dimension as u64) as usize;
            vector[idx] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Embedding::new(vector)
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed(&self, text: &str, _space: EmbeddingSpace) -> Result<Embedding, EmbeddingError> {
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidInput(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        Ok(self.hash_text(text))
    }

    fn dimension(&self, _space: EmbeddingSpace) -> usize {
        self.dimension
    }

    fn model_name(&self, _space: EmbeddingSpace) -> String {
        format!("hash-{}", self.dimension)
    }
}
