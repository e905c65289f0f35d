//! Domain configurations and the registry that resolves them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use sqlctx_config::{
    Config, ConfigError, ConfigValidator, DomainSettings, ValidationResult, DEFAULT_DOMAIN,
};

/// Retrieval parameters in effect for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub logic_distance_threshold: f32,
    pub schema_distance_threshold: f32,
    pub max_logics: usize,
    pub max_schemas: usize,
    pub keyword_boost_weight: f32,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self::from(&DomainSettings::default())
    }
}

impl From<&DomainSettings> for DomainConfig {
    fn from(settings: &DomainSettings) -> Self {
        Self {
            logic_distance_threshold: settings.logic_distance_threshold,
            schema_distance_threshold: settings.schema_distance_threshold,
            max_logics: settings.max_logics,
            max_schemas: settings.max_schemas,
            keyword_boost_weight: settings.keyword_boost_weight,
        }
    }
}

impl DomainConfig {
    /// Replace fields the caller supplied.
    pub fn with_overrides(mut self, overrides: &DomainOverrides) -> Self {
        if let Some(v) = overrides.max_logics {
            self.max_logics = v;
        }
        if let Some(v) = overrides.max_schemas {
            self.max_schemas = v;
        }
        if let Some(v) = overrides.logic_threshold {
            self.logic_distance_threshold = v;
        }
        if let Some(v) = overrides.schema_threshold {
            self.schema_distance_threshold = v;
        }
        self
    }

    /// True when `self` admits or returns less than `other` on any axis.
    pub fn is_stricter_than(&self, other: &Self) -> bool {
        self.logic_distance_threshold < other.logic_distance_threshold
            || self.schema_distance_threshold < other.schema_distance_threshold
            || self.max_logics < other.max_logics
            || self.max_schemas < other.max_schemas
    }
}

/// Per-request overrides of a domain's parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DomainOverrides {
    pub max_logics: Option<usize>,
    pub max_schemas: Option<usize>,
    pub logic_threshold: Option<f32>,
    pub schema_threshold: Option<f32>,
}

#[derive(Debug)]
struct DomainTable {
    default: DomainConfig,
    named: HashMap<String, DomainConfig>,
}

/// Registry of named domains plus the default.
///
/// Reads take a snapshot; [`DomainRegistry::reload`] swaps the whole table
/// so in-flight requests keep the configuration they started with.
#[derive(Debug)]
pub struct DomainRegistry {
    table: RwLock<Arc<DomainTable>>,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::new(DomainConfig::default(), HashMap::new())
    }
}

impl DomainRegistry {
    pub fn new(default: DomainConfig, named: HashMap<String, DomainConfig>) -> Self {
        Self {
            table: RwLock::new(Arc::new(DomainTable { default, named })),
        }
    }

    /// Build from the `domains` section, rejecting invalid entries.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let table = Self::build_table(config)?;
        Ok(Self {
            table: RwLock::new(Arc::new(table)),
        })
    }

    /// Replace every domain with those from `config`.
    ///
    /// On error the current table is left untouched.
    pub fn reload(&self, config: &Config) -> Result<usize, ConfigError> {
        let table = Self::build_table(config)?;
        let count = table.named.len();
        *self.table.write() = Arc::new(table);
        info!(domains = count, "Domain registry reloaded");
        Ok(count)
    }

    /// Configuration for `name`, falling back to the default when the name
    /// is absent or unknown.
    pub fn resolve(&self, name: Option<&str>) -> DomainConfig {
        let table = self.snapshot();
        name.and_then(|n| table.named.get(n.trim()))
            .copied()
            .unwrap_or(table.default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot().named.contains_key(name.trim())
    }

    /// Default first, then named domains in lexical order.
    pub fn list(&self) -> Vec<(String, DomainConfig)> {
        let table = self.snapshot();
        let mut named: Vec<_> = table
            .named
            .iter()
            .map(|(name, config)| (name.clone(), *config))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));

        let mut all = Vec::with_capacity(named.len() + 1);
        all.push((DEFAULT_DOMAIN.to_string(), table.default));
        all.extend(named);
        all
    }

    /// Number of named domains.
    pub fn len(&self) -> usize {
        self.snapshot().named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Arc<DomainTable> {
        self.table.read().clone()
    }

    fn build_table(config: &Config) -> Result<DomainTable, ConfigError> {
        if config.domains.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "domains".to_string(),
                message: "domain names must not be empty".to_string(),
            });
        }

        let mut result = ValidationResult::default();
        let mut default = DomainConfig::default();
        let mut named = HashMap::new();

        for (raw_name, settings) in &config.domains {
            let name = raw_name.trim();
            ConfigValidator::validate_domain(name, settings, &mut result);
            if name == DEFAULT_DOMAIN {
                default = DomainConfig::from(settings);
            } else {
                named.insert(name.to_string(), DomainConfig::from(settings));
            }
        }

        result.into_result()?;

        Ok(DomainTable { default, named })
    }
}

#[cfg(test)]
#[path = "domain_tests.rs"]
mod tests;
