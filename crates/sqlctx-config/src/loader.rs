//! Configuration loader.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_VAR_PATTERN.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.sqlctx`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DomainSettings;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(config.domains.is_empty());
    }

    #[test]
    fn test_load_server_section() {
        let content = r#"
            [server]
            host = "0.0.0.0"
            port = 3000
            allowed_origins = ["http://localhost:3000"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_load_domains() {
        let content = r#"
            [domains.default]
            logic_distance_threshold = 0.4

            [domains.ordini]
            logic_distance_threshold = 0.3
            schema_distance_threshold = 0.45
            max_logics = 5
            max_schemas = 10
            keyword_boost_weight = 0.2
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.domains.len(), 2);
        let ordini = &config.domains["ordini"];
        assert!((ordini.logic_distance_threshold - 0.3).abs() < 1e-6);
        assert_eq!(ordini.max_logics, 5);
        assert_eq!(ordini.max_schemas, 10);

        // Omitted fields fall back to built-in values
        let default = &config.domains["default"];
        assert_eq!(default.max_schemas, DomainSettings::default().max_schemas);
    }

    #[test]
    fn test_load_retrieval_section() {
        let content = r#"
            [retrieval]
            filter_by_domain = false
            timeout_ms = 2500

            [retrieval.auto_join]
            max_depth = 2
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.retrieval.filter_by_domain);
        assert_eq!(config.retrieval.timeout_ms, Some(2500));
        assert_eq!(config.retrieval.auto_join.max_depth, 2);
        assert!(config.retrieval.auto_join.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "port = 5000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_nonexistent_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_unknown_domain_field_rejected() {
        let content = r#"
            [domains.ordini]
            logic_threshold = 0.3
        "#;
        assert!(ConfigLoader::load_str(content).is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("SQLCTX_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${SQLCTX_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("test_value"));
        unsafe {
            std::env::remove_var("SQLCTX_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${SQLCTX_NONEXISTENT_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/catalog.json");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/catalog.json"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/srv/catalog.json"), "/srv/catalog.json");
    }
}
