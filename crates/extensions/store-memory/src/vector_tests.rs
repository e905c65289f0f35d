use super::*;

use serde_json::json;
use sqlctx_protocols::DOMAIN_TAGS_KEY;

fn emb(values: &[f32]) -> Embedding {
    Embedding::new(values.to_vec())
}

fn tagged(tags: &[&str]) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(DOMAIN_TAGS_KEY.to_string(), json!(tags));
    metadata
}

fn store_with_orders() -> InMemoryVectorStore {
    let store = InMemoryVectorStore::new();
    store
        .upsert(EmbeddingSpace::Schema, "SORDER", emb(&[1.0, 0.0, 0.0]), tagged(&["ordini"]))
        .unwrap();
    store
        .upsert(EmbeddingSpace::Schema, "SORDERQ", emb(&[0.9, 0.1, 0.0]), tagged(&["ordini"]))
        .unwrap();
    store
        .upsert(
            EmbeddingSpace::Schema,
            "ITMMASTER",
            emb(&[0.0, 1.0, 0.0]),
            tagged(&["magazzino"]),
        )
        .unwrap();
    store
}

#[tokio::test]
async fn test_query_orders_by_distance() {
    let store = store_with_orders();
    let hits = store
        .query(EmbeddingSpace::Schema, &emb(&[1.0, 0.0, 0.0]), 1.0, 10, None)
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["SORDER", "SORDERQ", "ITMMASTER"]);
    assert!(hits[0].distance.abs() < 1e-6);
    // Orthogonal vectors sit at the midpoint.
    assert!((hits[2].distance - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn test_query_applies_threshold_and_limit() {
    let store = store_with_orders();
    let query = emb(&[1.0, 0.0, 0.0]);

    let hits = store
        .query(EmbeddingSpace::Schema, &query, 0.1, 10, None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);

    let hits = store
        .query(EmbeddingSpace::Schema, &query, 1.0, 1, None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "SORDER");
}

#[tokio::test]
async fn test_query_filters_by_domain() {
    let store = store_with_orders();
    store
        .upsert(EmbeddingSpace::Schema, "SHARED", emb(&[0.0, 0.0, 1.0]), Metadata::new())
        .unwrap();

    let filter = MetadataFilter::new(DOMAIN_TAGS_KEY, "magazzino");
    let hits = store
        .query(EmbeddingSpace::Schema, &emb(&[0.0, 1.0, 0.0]), 1.0, 10, Some(&filter))
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["ITMMASTER", "SHARED"]);
}

#[tokio::test]
async fn test_ties_keep_insertion_order() {
    let store = InMemoryVectorStore::new();
    for id in ["B", "A", "C"] {
        store
            .upsert(EmbeddingSpace::Logic, id, emb(&[0.0, 1.0]), Metadata::new())
            .unwrap();
    }

    let hits = store
        .query(EmbeddingSpace::Logic, &emb(&[1.0, 0.0]), 1.0, 10, None)
        .await
        .unwrap();
    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["B", "A", "C"]);
}

#[tokio::test]
async fn test_collections_are_independent() {
    let store = store_with_orders();
    assert_eq!(store.len(EmbeddingSpace::Schema), 3);
    assert_eq!(store.len(EmbeddingSpace::Logic), 0);

    let hits = store
        .query(EmbeddingSpace::Logic, &emb(&[1.0, 0.0, 0.0]), 1.0, 10, None)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_query_dimension_mismatch() {
    let store = store_with_orders();
    let result = store
        .query(EmbeddingSpace::Schema, &emb(&[1.0, 0.0]), 1.0, 10, None)
        .await;
    assert!(matches!(result, Err(StoreError::QueryError(_))));
}

#[test]
fn test_upsert_replaces_in_place() {
    let store = store_with_orders();
    store
        .upsert(EmbeddingSpace::Schema, "SORDER", emb(&[0.0, 0.0, 1.0]), Metadata::new())
        .unwrap();
    assert_eq!(store.len(EmbeddingSpace::Schema), 3);
}

#[test]
fn test_upsert_rejects_dimension_change() {
    let store = store_with_orders();
    let result = store.upsert(EmbeddingSpace::Schema, "X", emb(&[1.0]), Metadata::new());
    assert!(result.is_err());
}

#[test]
fn test_remove_and_clear() {
    let store = store_with_orders();
    assert!(store.remove(EmbeddingSpace::Schema, "SORDER"));
    assert!(!store.remove(EmbeddingSpace::Schema, "SORDER"));
    assert_eq!(store.len(EmbeddingSpace::Schema), 2);

    store.clear();
    assert!(store.is_empty());
}
