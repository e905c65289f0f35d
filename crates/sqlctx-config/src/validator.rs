//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, DomainSettings, DEFAULT_DOMAIN};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_embedding(config, &mut result);
        Self::validate_catalog(config, &mut result);
        Self::validate_retrieval(config, &mut result);
        Self::validate_domains(config, &mut result);

        result
    }

    /// Check one domain's settings, reporting under `domains.<name>`.
    pub fn validate_domain(name: &str, settings: &DomainSettings, result: &mut ValidationResult) {
        let prefix = format!("domains.{}", name);

        for (field, value) in [
            ("logic_distance_threshold", settings.logic_distance_threshold),
            ("schema_distance_threshold", settings.schema_distance_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                result.add_error(ValidationError::new(
                    format!("{}.{}", prefix, field),
                    format!("{} must be within [0, 1], got {}", field, value),
                ));
            }
        }

        if settings.max_schemas == 0 {
            result.add_error(ValidationError::new(
                format!("{}.max_schemas", prefix),
                "max_schemas must be greater than 0",
            ));
        }

        if settings.max_logics == 0 {
            result.add_warning(ValidationWarning::new(
                format!("{}.max_logics", prefix),
                "max_logics is 0, this domain always uses schema-only retrieval",
            ));
        }

        if !settings.keyword_boost_weight.is_finite() || settings.keyword_boost_weight < 0.0 {
            result.add_error(ValidationError::new(
                format!("{}.keyword_boost_weight", prefix),
                "keyword_boost_weight must be a non-negative number",
            ));
        }
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_embedding(config: &Config, result: &mut ValidationResult) {
        let valid_providers = ["hash", "openai"];
        if !valid_providers.contains(&config.embedding.provider.as_str()) {
            result.add_error(ValidationError::new(
                "embedding.provider",
                format!(
                    "Unknown embedding provider '{}', valid values: {:?}",
                    config.embedding.provider, valid_providers
                ),
            ));
        }

        if config.embedding.dimension == 0 {
            result.add_error(ValidationError::new(
                "embedding.dimension",
                "dimension must be greater than 0",
            ));
        }

        if let Some(ref url) = config.embedding.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "embedding.base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }

        if config.embedding.provider == "openai" && config.embedding.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "embedding.api_key",
                "API key is not set, requests to the embedding service may be rejected",
            ));
        }
    }

    fn validate_catalog(config: &Config, result: &mut ValidationResult) {
        match config.catalog.path {
            None => result.add_warning(ValidationWarning::new(
                "catalog.path",
                "No catalog configured, the stores will start empty",
            )),
            Some(ref path) if !path.exists() => result.add_warning(ValidationWarning::new(
                "catalog.path",
                format!("Catalog file does not exist: {:?}", path),
            )),
            Some(_) => {}
        }
    }

    fn validate_retrieval(config: &Config, result: &mut ValidationResult) {
        if config.retrieval.timeout_ms == Some(0) {
            result.add_error(ValidationError::new(
                "retrieval.timeout_ms",
                "timeout_ms must be greater than 0 when set",
            ));
        }

        if config.retrieval.auto_join.max_depth > 5 {
            result.add_warning(ValidationWarning::new(
                "retrieval.auto_join.max_depth",
                "max_depth is very high (>5), expansions will mostly be cut by max_schemas",
            ));
        }
    }

    fn validate_domains(config: &Config, result: &mut ValidationResult) {
        let mut names: Vec<&String> = config.domains.keys().collect();
        names.sort();

        for name in names {
            if name.trim().is_empty() {
                result.add_error(ValidationError::new("domains", "Domain name cannot be empty"));
                continue;
            }
            Self::validate_domain(name, &config.domains[name], result);
        }

        if config.domains.keys().all(|n| n == DEFAULT_DOMAIN) {
            result.add_warning(ValidationWarning::new(
                "domains",
                "No named domains configured, every request uses the default settings",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
