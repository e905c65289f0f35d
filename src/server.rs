//! Engine assembly and server startup for sqlctx.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sqlctx_api::{ApiServer, AppState};
use sqlctx_config::{Config, ConfigLoader, EmbeddingConfig, LoggingConfig};
use sqlctx_core::{DomainRegistry, Retriever, RetrieverOptions};
use sqlctx_embedding_openai::OpenAIEmbedding;
use sqlctx_protocols::EmbeddingProvider;
use sqlctx_store_memory::{Catalog, CatalogStores, HashEmbedding};

type BoxError = Box<dyn std::error::Error>;

/// Log directory from config, or `~/.sqlctx/logs`.
fn log_dir(config: &LoggingConfig) -> PathBuf {
    match &config.dir {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sqlctx")
            .join("logs"),
    }
}

/// Initialize tracing with console (stderr) and daily-rotated file output.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub(crate) fn init_tracing(config: &LoggingConfig) -> Result<(), BoxError> {
    let log_dir = log_dir(config);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("sqlctx")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Dropping the guard stops the background writer.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Stdout is reserved for command output.
    let console_text = (!config.json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let console_json = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_text)
        .with(console_json)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Build the embedding provider named by `embedding.provider`.
pub(crate) fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, BoxError> {
    match config.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedding::new(config.dimension))),
        "openai" => {
            let mut provider = OpenAIEmbedding::new(config.api_key.clone())
                .with_models(&config.logic_model, &config.schema_model)
                .with_dimension(config.dimension);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url);
            }
            Ok(Arc::new(provider))
        }
        other => Err(format!("Unknown embedding provider: {}", other).into()),
    }
}

/// Load the catalog into in-memory stores. No catalog yields empty stores.
async fn load_stores(
    config: &Config,
    embedder: &dyn EmbeddingProvider,
) -> Result<CatalogStores, BoxError> {
    let catalog = match &config.catalog.path {
        Some(path) => {
            let path = PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy()));
            let catalog = Catalog::load(&path)?;
            info!(
                path = %path.display(),
                logics = catalog.logics.len(),
                schemas = catalog.schemas.len(),
                "Catalog loaded"
            );
            catalog
        }
        None => {
            warn!("No catalog configured, every search will return empty results");
            Catalog::default()
        }
    };
    Ok(catalog.into_stores(embedder).await?)
}

/// Assemble a retriever from configuration.
pub(crate) async fn build_retriever(config: &Config) -> Result<Retriever, BoxError> {
    let domains = Arc::new(DomainRegistry::from_config(config)?);
    let embedder = build_embedder(&config.embedding)?;
    let stores = load_stores(config, embedder.as_ref()).await?;

    info!(
        provider = %config.embedding.provider,
        domains = domains.len(),
        "Retriever ready"
    );

    Ok(Retriever::new(
        embedder,
        Arc::new(stores.vectors),
        Arc::new(stores.metadata),
        domains,
    )
    .with_options(RetrieverOptions::from(&config.retrieval)))
}

/// Run the HTTP server until Ctrl+C.
pub(crate) async fn run_server(
    mut config: Config,
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), BoxError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let retriever = Arc::new(build_retriever(&config).await?);
    let mut state = AppState::new(retriever);
    if config_path.exists() {
        state = state.with_config_path(config_path);
    }

    let server = ApiServer::new(config.server, Arc::new(state));
    info!("Starting sqlctx v{} on {}", env!("CARGO_PKG_VERSION"), server.addr());
    server.run().await
}
