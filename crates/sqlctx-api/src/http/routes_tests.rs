use super::*;
use crate::test_support::test_state;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use tower::ServiceExt;

async fn create_test_router() -> Router {
    create_router(test_state().await, &[])
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn search_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/search")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = create_test_router().await;
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "sqlctx-api");
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = create_test_router().await;
    let body = serde_json::json!({
        "query": "ordini per cliente negli ultimi 30 giorni",
        "max_schemas": 3
    });

    let response = app
        .oneshot(search_request(&body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["strategy"], "logic_driven");
    assert_eq!(body["logics"][0]["id"], "ord-001");
    assert!(body["schemas"].as_array().unwrap().len() <= 3);
    assert!(body["logics"][0]["embedding_distance"].is_number());
}

#[tokio::test]
async fn test_search_blank_query_is_400() {
    let app = create_test_router().await;

    let response = app
        .oneshot(search_request(r#"{"query": "  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_search_malformed_json_is_400() {
    let app = create_test_router().await;

    let response = app.oneshot(search_request("{\"query\": ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn test_search_unknown_field_is_400() {
    let app = create_test_router().await;

    let response = app
        .oneshot(search_request(r#"{"query": "ordini", "top_k": 5}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_without_content_type_is_400() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/search")
                .body(Body::from(r#"{"query": "ordini"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_domains_endpoint() {
    let app = create_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/domains")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["domains"][0]["name"], "default");
    assert_eq!(body["domains"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = create_test_router().await;
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
}

#[tokio::test]
async fn test_reload_without_config_is_conflict() {
    let app = create_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "reload_unsupported");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_router().await;
    let response = app
        .oneshot(Request::builder().uri("/api/v2/search").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let origins = vec!["http://erp.local".to_string()];
    let app = create_router(test_state().await, &origins);

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://erp.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://erp.local"
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://elsewhere.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_permissive_by_default() {
    let app = create_test_router().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "http://anywhere.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
