use super::*;
use crate::test_support::test_state;
use axum::http::StatusCode;
use sqlctx_core::Strategy;

#[tokio::test]
async fn test_service_info_lists_endpoints() {
    let Json(info) = service_info().await;
    assert_eq!(info.name, "sqlctx-api");
    assert!(info.endpoints.iter().any(|e| e == "POST /api/v1/search"));
}

#[tokio::test]
async fn test_search_returns_result_and_counts_it() {
    let state = test_state().await;
    let request = RetrievalRequest::new("ordini per cliente negli ultimi 30 giorni");

    let Json(result) = search(State(state.clone()), Ok(Json(request))).await.unwrap();

    assert_eq!(result.strategy, Strategy::LogicDriven);
    assert_eq!(result.logics[0].id, "ord-001");
    assert_eq!(state.request_count(), 1);
    assert_eq!(state.search_stats().logic_driven, 1);
}

#[tokio::test]
async fn test_search_invalid_request_is_bad_request() {
    let state = test_state().await;
    let request = RetrievalRequest::new("   ");

    let err = search(State(state.clone()), Ok(Json(request)))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.search_stats().invalid_requests, 1);
}

#[tokio::test]
async fn test_search_unknown_domain_reports_requested_name() {
    let state = test_state().await;
    let request = RetrievalRequest::new("zzz qqq").with_domain("spedizioni");

    let Json(result) = search(State(state), Ok(Json(request))).await.unwrap();
    assert_eq!(result.domain, "spedizioni");
}

#[tokio::test]
async fn test_list_domains_default_first() {
    let state = test_state().await;

    let Json(response) = list_domains(State(state)).await;
    let names: Vec<_> = response.domains.iter().map(|d| d.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["default", "clienti", "contabilita", "magazzino", "ordini"]
    );
    assert_eq!(response.domains[4].config.max_schemas, 6);
}

#[test]
fn test_domain_entry_flattens_config() {
    let entry = DomainEntry {
        name: "ordini".to_string(),
        config: DomainConfig::default(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["name"], "ordini");
    assert!(json.get("max_logics").is_some());
    assert!(json.get("config").is_none());
}
