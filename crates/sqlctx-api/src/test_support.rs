//! Shared fixtures for handler tests.

use std::sync::Arc;

use sqlctx_config::ConfigLoader;
use sqlctx_core::{DomainRegistry, Retriever, RetrieverOptions};
use sqlctx_store_memory::{Catalog, HashEmbedding};

use crate::state::AppState;

pub(crate) const CONFIG: &str = include_str!("../../../config/default.toml");
pub(crate) const CATALOG: &str = include_str!("../../../config/catalog.json");

pub(crate) async fn test_retriever() -> Arc<Retriever> {
    let config = ConfigLoader::load_str(CONFIG).unwrap();
    let embedder = Arc::new(HashEmbedding::new(config.embedding.dimension));
    let stores = Catalog::from_json(CATALOG)
        .unwrap()
        .into_stores(embedder.as_ref())
        .await
        .unwrap();

    Arc::new(
        Retriever::new(
            embedder,
            Arc::new(stores.vectors),
            Arc::new(stores.metadata),
            Arc::new(DomainRegistry::from_config(&config).unwrap()),
        )
        .with_options(RetrieverOptions::from(&config.retrieval)),
    )
}

pub(crate) async fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(test_retriever().await))
}
