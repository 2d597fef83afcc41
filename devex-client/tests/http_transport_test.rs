//! HTTP transport and service integration tests against a mock backend

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devex_client::{ClientConfig, DashboardService, DevexTransport, HttpTransport, TransportError};
use devex_core::{FrictionStatus, InitiativeDraft, LoadIssue, ScopeLevel};

async fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(ClientConfig::new(server.uri())).expect("client builds")
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_team_metrics_sends_level_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .and(query_param("level", "team"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"team_id": "t1", "date": "2024-05-01T00:00:00Z", "devex_score": 72},
            {"team_id": "t1", "date": "2024-04-01T00:00:00Z", "devex_score": 60}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server).await;
    let records = transport.fetch_metrics(ScopeLevel::Team, 50).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].scope_id, "t1");
    assert_eq!(records[0].scope_level, ScopeLevel::Team);
    assert_eq!(records[0].devex_score, Some(72.0));
}

#[tokio::test]
async fn test_fetch_frictions_and_teams() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/frictions",
        json!([
            {"_id": "f1", "title": "Slow CI", "category": "tooling", "severity": 4, "status": "open"},
            {"_id": "f2", "title": "Docs", "category": "knowledge", "severity": 2, "status": "archived"}
        ]),
    )
    .await;
    mount_json(&server, "/teams", json!([{"_id": "T1", "name": "Platform"}])).await;

    let transport = transport_for(&server).await;
    let frictions = transport.fetch_frictions().await.unwrap();
    let teams = transport.fetch_teams().await.unwrap();

    assert_eq!(frictions.len(), 2);
    assert_eq!(frictions[0].status, FrictionStatus::Open);
    assert_eq!(frictions[1].status, FrictionStatus::Unknown("archived".to_string()));
    assert_eq!(teams[0].id, "T1");
}

#[tokio::test]
async fn test_null_fields_keep_the_rest_of_the_list() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/frictions",
        json!([
            {"_id": "f1", "title": "Slow CI", "category": "tooling", "severity": 4, "status": "open"},
            {"_id": "f2", "id": "f2", "title": "Docs", "category": null, "status": null}
        ]),
    )
    .await;
    mount_json(&server, "/teams", json!([{"_id": "T1", "name": null}])).await;

    let transport = transport_for(&server).await;
    let frictions = transport.fetch_frictions().await.unwrap();
    let teams = transport.fetch_teams().await.unwrap();

    assert_eq!(frictions.len(), 2);
    assert_eq!(frictions[1].id, "f2");
    assert_eq!(frictions[1].category, "");
    assert_eq!(frictions[1].status, FrictionStatus::Unknown(String::new()));
    assert_eq!(teams[0].id, "T1");
    assert_eq!(teams[0].name, "");
}

#[tokio::test]
async fn test_server_error_maps_to_request_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/benchmarks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let transport = transport_for(&server).await;
    let err = transport.fetch_benchmarks().await.unwrap_err();

    match err {
        TransportError::RequestFailed { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let transport = transport_for(&server).await;
    let err = transport.fetch_teams().await.unwrap_err();
    assert!(matches!(err, TransportError::ParseError(_)));
}

#[tokio::test]
async fn test_dashboard_survives_failed_benchmarks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .and(query_param("level", "org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"org_id": "acme", "date": "2024-05-01", "devex_score": 68, "trend": 1.5}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .and(query_param("level", "team"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"team_id": "a", "date": "2024-05-01", "devex_score": 80, "motivation": 70, "wasted_time_hours": 2},
            {"team_id": "b", "date": "2024-05-01", "devex_score": 60, "motivation": 50, "wasted_time_hours": 4}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/benchmarks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_json(&server, "/frictions", json!([])).await;

    let service = DashboardService::new(Arc::new(transport_for(&server).await));
    let snapshot = service.load_dashboard().await;

    assert_eq!(snapshot.issues, vec![LoadIssue::Benchmarks]);
    assert_eq!(snapshot.overview.devex.value, 68.0);
    assert_eq!(snapshot.aggregates.average_devex, 70.0);
    assert_eq!(snapshot.aggregates.average_motivation, 60.0);
    assert_eq!(snapshot.aggregates.average_wasted_hours, 3.0);
}

#[tokio::test]
async fn test_create_initiative_posts_normalized_payload() {
    let server = MockServer::start().await;
    mount_json(&server, "/teams", json!([{"_id": "T1", "name": "Platform"}])).await;
    Mock::given(method("POST"))
        .and(path("/initiatives"))
        .and(body_partial_json(json!({
            "title": "DevEx Initiative",
            "scope": "team",
            "team_id": "T1",
            "owner": "You",
            "goals": ["Reduce flakiness"],
            "status": "planned",
            "progress": 0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "init-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = DashboardService::new(Arc::new(transport_for(&server).await));
    let draft = InitiativeDraft::new().with_goals(["", "Reduce flakiness", "  "]);
    let receipt = service.create_initiative(&draft).await.unwrap();

    assert_eq!(receipt.response["id"], "init-1");
    assert_eq!(receipt.initiative.team_id.as_deref(), Some("T1"));
}
