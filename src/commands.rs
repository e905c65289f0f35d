//! One-shot CLI commands.

use std::path::Path;

use sqlctx_config::{Config, ConfigLoader, ConfigValidator};
use sqlctx_core::{DomainConfig, DomainRegistry, RetrievalRequest};
use sqlctx_store_memory::Catalog;

use crate::server::build_retriever;

type BoxError = Box<dyn std::error::Error>;

pub(crate) async fn cmd_search(config: &Config, request: RetrievalRequest) -> Result<(), BoxError> {
    let retriever = build_retriever(config).await?;
    let result = retriever.retrieve(request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn cmd_domains(config: &Config) -> Result<(), BoxError> {
    let registry = DomainRegistry::from_config(config)?;
    print!("{}", format_domains(&registry.list()));
    Ok(())
}

fn format_domains(domains: &[(String, DomainConfig)]) -> String {
    let mut out = format!(
        "{:<16} {:>10} {:>10} {:>10} {:>11} {:>7}\n",
        "DOMAIN", "LOGIC_THR", "SCHEMA_THR", "MAX_LOGICS", "MAX_SCHEMAS", "BOOST"
    );
    for (name, c) in domains {
        out.push_str(&format!(
            "{:<16} {:>10.2} {:>10.2} {:>10} {:>11} {:>7.2}\n",
            name,
            c.logic_distance_threshold,
            c.schema_distance_threshold,
            c.max_logics,
            c.max_schemas,
            c.keyword_boost_weight
        ));
    }
    out
}

/// Validate the config file and its catalog.
///
/// Prints every error and warning; fails when any error was found.
pub(crate) fn cmd_check_config(path: &Path) -> Result<(), BoxError> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        return Err(format!("{} configuration error(s)", result.errors.len()).into());
    }

    if let Some(catalog_path) = &config.catalog.path {
        let catalog_path = ConfigLoader::expand_path(&catalog_path.to_string_lossy());
        let catalog = Catalog::load(Path::new(&catalog_path))?;
        println!(
            "catalog: {} logics, {} schemas, tags {:?}",
            catalog.logics.len(),
            catalog.schemas.len(),
            catalog.domain_tags()
        );
    }

    println!("{} is valid", path.display());
    Ok(())
}
