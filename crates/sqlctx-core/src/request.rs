//! Retrieval request.

use serde::{Deserialize, Serialize};

use crate::domain::DomainOverrides;
use crate::error::RetrievalError;

/// One retrieval query with optional per-request overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalRequest {
    pub query: String,

    /// Domain whose configuration applies. Detected when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_logics: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_schemas: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_threshold: Option<f32>,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_max_logics(mut self, max_logics: usize) -> Self {
        self.max_logics = Some(max_logics);
        self
    }

    pub fn with_max_schemas(mut self, max_schemas: usize) -> Self {
        self.max_schemas = Some(max_schemas);
        self
    }

    pub fn with_logic_threshold(mut self, threshold: f32) -> Self {
        self.logic_threshold = Some(threshold);
        self
    }

    pub fn with_schema_threshold(mut self, threshold: f32) -> Self {
        self.schema_threshold = Some(threshold);
        self
    }

    /// Trimmed domain name, if one was given.
    pub fn domain_name(&self) -> Option<&str> {
        self.domain.as_deref().map(str::trim)
    }

    pub fn overrides(&self) -> DomainOverrides {
        DomainOverrides {
            max_logics: self.max_logics,
            max_schemas: self.max_schemas,
            logic_threshold: self.logic_threshold,
            schema_threshold: self.schema_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.query.trim().is_empty() {
            return Err(invalid("query must not be empty"));
        }
        if self.domain_name().is_some_and(str::is_empty) {
            return Err(invalid("domain must not be empty when given"));
        }
        for (field, cap) in [("max_logics", self.max_logics), ("max_schemas", self.max_schemas)] {
            if cap == Some(0) {
                return Err(invalid(&format!("{} must be greater than 0", field)));
            }
        }
        for (field, threshold) in [
            ("logic_threshold", self.logic_threshold),
            ("schema_threshold", self.schema_threshold),
        ] {
            if let Some(value) = threshold {
                if !(0.0..=1.0).contains(&value) {
                    return Err(invalid(&format!(
                        "{} must be within [0, 1], got {}",
                        field, value
                    )));
                }
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> RetrievalError {
    RetrievalError::InvalidRequest(message.to_string())
}
