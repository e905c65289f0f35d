use super::*;
use crate::test_support::{test_retriever, test_state};
use async_trait::async_trait;
use sqlctx_core::{DomainRegistry, Retriever};
use sqlctx_protocols::{CollectionCounts, LogicRecord, MetadataStore, SchemaRecord, StoreError};
use sqlctx_store_memory::{HashEmbedding, InMemoryMetadataStore, InMemoryVectorStore};

struct DownStore;

#[async_trait]
impl MetadataStore for DownStore {
    async fn get_schema(&self, _table: &str) -> Result<Option<SchemaRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get_logic(&self, _id: &str) -> Result<Option<LogicRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn counts(&self) -> Result<CollectionCounts, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

fn state_with_store(store: Arc<dyn MetadataStore>) -> Arc<AppState> {
    let retriever = Retriever::new(
        Arc::new(HashEmbedding::new(64)),
        Arc::new(InMemoryVectorStore::new()),
        store,
        Arc::new(DomainRegistry::default()),
    );
    Arc::new(AppState::new(Arc::new(retriever)))
}

#[tokio::test]
async fn test_health_reports_catalog_sizes() {
    let state = test_state().await;

    let (code, Json(health)) = health_check(State(state)).await;

    assert_eq!(code, StatusCode::OK);
    assert_eq!(health.status, HealthStatus::Healthy);
    let store = &health.components[0];
    assert_eq!(store.name, "metadata_store");
    assert_eq!(store.message.as_deref(), Some("8 logics, 10 schemas"));
    assert_eq!(health.components[2].message.as_deref(), Some("4 named"));
}

#[tokio::test]
async fn test_health_empty_catalog_is_degraded() {
    let state = state_with_store(Arc::new(InMemoryMetadataStore::new()));

    let (code, Json(health)) = health_check(State(state)).await;

    assert_eq!(code, StatusCode::OK);
    assert_eq!(health.status, HealthStatus::Degraded);
}

#[tokio::test]
async fn test_health_store_down_is_unhealthy() {
    let state = state_with_store(Arc::new(DownStore));

    let (code, Json(health)) = health_check(State(state)).await;

    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health.status, HealthStatus::Unhealthy);
    assert!(health.components[0]
        .message
        .as_deref()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn test_metrics_content() {
    let state = Arc::new(AppState::new(test_retriever().await));
    state.increment_requests();
    state.record_reload();

    let metrics = prometheus_metrics(State(state)).await;

    assert!(metrics.content.contains("sqlctx_up 1"));
    assert!(metrics.content.contains("sqlctx_http_requests_total 1"));
    assert!(metrics.content.contains("sqlctx_config_reloads_total 1"));
    assert!(metrics.content.contains("sqlctx_domains_configured 4"));
    assert!(metrics
        .content
        .contains(r#"sqlctx_collection_documents{collection="schemas"} 10"#));
    assert!(metrics
        .content
        .contains(r#"sqlctx_embedding_model_info{space="logic",model="hash-512",dimension="512"} 1"#));
}

#[tokio::test]
async fn test_metrics_omit_sizes_when_store_down() {
    let state = state_with_store(Arc::new(DownStore));

    let metrics = prometheus_metrics(State(state)).await;

    assert!(metrics.content.contains("sqlctx_up 1"));
    assert!(!metrics.content.contains("sqlctx_collection_documents"));
}

#[test]
fn test_health_status_serialization() {
    let json = serde_json::to_string(&HealthStatus::Degraded).unwrap();
    assert_eq!(json, "\"degraded\"");
}

#[test]
fn test_prometheus_content_type() {
    let response = PrometheusMetrics {
        content: "sqlctx_up 1\n".to_string(),
    }
    .into_response();
    assert_eq!(
        response.headers()[axum::http::header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
}
