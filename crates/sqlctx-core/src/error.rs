//! Retrieval errors.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use sqlctx_protocols::{EmbeddingError, StoreError};

/// Collaborator that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    EmbeddingProvider,
    VectorStore,
    MetadataStore,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmbeddingProvider => "embedding provider",
            Self::VectorStore => "vector store",
            Self::MetadataStore => "metadata store",
        })
    }
}

/// Orchestration phase in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LogicSearch,
    SchemaExpand,
    SchemaSearch,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LogicSearch => "logic search",
            Self::SchemaExpand => "schema expansion",
            Self::SchemaSearch => "schema search",
        })
    }
}

/// Error category exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    DependencyUnavailable,
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{collaborator} unavailable during {phase}: {message}")]
    DependencyUnavailable {
        collaborator: Collaborator,
        phase: Phase,
        message: String,
    },

    #[error("Retrieval deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl RetrievalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::DependencyUnavailable { .. } | Self::DeadlineExceeded(_) => {
                ErrorKind::DependencyUnavailable
            }
        }
    }

    pub(crate) fn embedding(phase: Phase, err: EmbeddingError) -> Self {
        Self::DependencyUnavailable {
            collaborator: Collaborator::EmbeddingProvider,
            phase,
            message: err.to_string(),
        }
    }

    pub(crate) fn vector_store(phase: Phase, err: StoreError) -> Self {
        Self::DependencyUnavailable {
            collaborator: Collaborator::VectorStore,
            phase,
            message: err.to_string(),
        }
    }

    pub(crate) fn metadata_store(phase: Phase, err: StoreError) -> Self {
        Self::DependencyUnavailable {
            collaborator: Collaborator::MetadataStore,
            phase,
            message: err.to_string(),
        }
    }
}
