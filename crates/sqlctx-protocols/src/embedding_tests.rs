use super::*;

#[test]
fn test_embedding_creation() {
    let emb = Embedding::new(vec![0.5, 0.5, 0.0, 0.0]);
    assert_eq!(emb.dimension, 4);
}

#[test]
fn test_cosine_similarity_identical() {
    let emb1 = Embedding::new(vec![1.0, 0.0, 0.0]);
    let emb2 = Embedding::new(vec![1.0, 0.0, 0.0]);
    assert!((emb1.cosine_similarity(&emb2) - 1.0).abs() < 0.001);
}

#[test]
fn test_cosine_similarity_different_dimensions() {
    let emb1 = Embedding::new(vec![1.0, 0.0, 0.0]);
    let emb2 = Embedding::new(vec![1.0, 0.0]);
    assert_eq!(emb1.cosine_similarity(&emb2), 0.0);
}

#[test]
fn test_cosine_distance_bounds() {
    let a = Embedding::new(vec![1.0, 0.0]);
    let same = Embedding::new(vec![2.0, 0.0]);
    let orthogonal = Embedding::new(vec![0.0, 1.0]);
    let opposite = Embedding::new(vec![-1.0, 0.0]);

    assert!(a.cosine_distance(&same).abs() < 0.001);
    assert!((a.cosine_distance(&orthogonal) - 0.5).abs() < 0.001);
    assert!((a.cosine_distance(&opposite) - 1.0).abs() < 0.001);
}

#[test]
fn test_cosine_distance_zero_vector() {
    let a = Embedding::new(vec![1.0, 0.0]);
    let zero = Embedding::new(vec![0.0, 0.0]);
    assert!((a.cosine_distance(&zero) - 0.5).abs() < 0.001);
}

#[test]
fn test_space_display() {
    assert_eq!(EmbeddingSpace::Logic.to_string(), "logic");
    assert_eq!(EmbeddingSpace::Schema.to_string(), "schema");
}

#[test]
fn test_space_serialization() {
    assert_eq!(
        serde_json::to_string(&EmbeddingSpace::Schema).unwrap(),
        "\"schema\""
    );
    let space: EmbeddingSpace = serde_json::from_str("\"logic\"").unwrap();
    assert_eq!(space, EmbeddingSpace::Logic);
}

#[test]
fn test_embedding_deserialization() {
    let json = r#"{"vector":[0.5,0.5],"dimension":2}"#;
    let emb: Embedding = serde_json::from_str(json).unwrap();
    assert_eq!(emb.dimension, 2);
    assert_eq!(emb.vector, vec![0.5, 0.5]);
}
