//! OpenAI embedding provider.

use async_trait::async_trait;
use tracing::debug;

use sqlctx_protocols::{Embedding, EmbeddingError, EmbeddingProvider, EmbeddingSpace};

use crate::api::{EmbeddingRequest, EmbeddingResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSION: usize = 1536;

pub struct OpenAIEmbedding {
    api_key: Option<String>,
    base_url: String,
    logic_model: String,
    schema_model: String,
    dimension: usize,
    client: reqwest::Client,
}

impl OpenAIEmbedding {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            logic_model: DEFAULT_MODEL.to_string(),
            schema_model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
            client: reqwest::Client::new(),
        }
    }

    /// Point at an OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(mut self, logic: impl Into<String>, schema: impl Into<String>) -> Self {
        self.logic_model = logic.into();
        self.schema_model = schema.into();
        self
    }

    /// Expected vector length; responses of any other length are rejected.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    fn model(&self, space: EmbeddingSpace) -> &str {
        match space {
            EmbeddingSpace::Logic => &self.logic_model,
            EmbeddingSpace::Schema => &self.schema_model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbedding {
    async fn embed(&self, text: &str, space: EmbeddingSpace) -> Result<Embedding, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("text is empty".to_string()));
        }

        let model = self.model(space);
        let mut request = self
            .client
            .post(self.endpoint())
            .json(&EmbeddingRequest { model, input: text });
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("{} returned {}: {}", model, status.as_u16(), body);
            return Err(if status.is_server_error() || status.as_u16() == 429 {
                EmbeddingError::Unavailable(message)
            } else {
                EmbeddingError::Failed(message)
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Failed(format!("invalid response: {}", e)))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::Failed("response contained no embedding".to_string()))?;

        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        debug!(model, space = %space, "Embedded text");
        Ok(Embedding::new(vector))
    }

    fn dimension(&self, _space: EmbeddingSpace) -> usize {
        self.dimension
    }

    fn model_name(&self, space: EmbeddingSpace) -> String {
        self.model(space).to_string()
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
