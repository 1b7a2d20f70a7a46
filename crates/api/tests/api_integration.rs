//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::InMemoryRecordStore;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> Router {
    setup_with_store().0
}

fn setup_with_store() -> (Router, InMemoryRecordStore) {
    let store = InMemoryRecordStore::new();
    let state: Arc<AppState<InMemoryRecordStore>> = api::create_state(store.clone());
    (api::create_app(state, get_metrics_handle()), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn deposit(app: &Router, diameter: f64, weight: f64) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/stock",
        Some(json!({ "diameter": diameter, "weight": weight })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json
}

async fn available(app: &Router, diameter: f64) -> Value {
    let (status, json) = send(
        app,
        "GET",
        &format!("/stock/available?diameter={diameter}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["availableWeight"].clone()
}

async fn create_process(app: &Router, name: &str, weight_used: f64) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/processes",
        Some(json!({
            "name": name,
            "diameter": 12,
            "weightUsed": weight_used,
            "bladeDiameter": 3,
            "numberOfRods": 8
        })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    deposit(&app, 12.0, 1.0).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_deposit_and_available_weight() {
    let app = setup();

    let json = deposit(&app, 12.0, 10.0).await;
    assert_eq!(json["entry"]["weight"], 10.0);
    assert_eq!(json["transaction"]["type"], "in");
    assert_eq!(json["availableWeight"], 10.0);

    deposit(&app, 12.0, 5.0).await;
    assert_eq!(available(&app, 12.0).await, 15.0);
    assert_eq!(available(&app, 8.0).await, 0.0);

    let (status, json) = send(&app, "GET", "/diameters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([12.0]));
}

#[tokio::test]
async fn test_deposit_rejects_non_positive_weight() {
    let app = setup();
    let (status, json) = send(
        &app,
        "POST",
        "/stock",
        Some(json!({ "diameter": 12, "weight": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("weight"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup();
    let (status, json) = send(&app, "POST", "/stock", Some(json!({ "diameter": 12 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_over_withdrawal_conflicts_and_changes_nothing() {
    let app = setup();
    deposit(&app, 12.0, 4.0).await;

    let (status, json) = send(
        &app,
        "POST",
        "/stock/withdrawals",
        Some(json!({ "diameter": 12, "weight": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("Insufficient stock"));
    assert_eq!(available(&app, 12.0).await, 4.0);

    let (status, json) = send(
        &app,
        "POST",
        "/stock/withdrawals",
        Some(json!({ "diameter": 12, "weight": 1.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["availableWeight"], 2.5);
    assert_eq!(json["transaction"]["type"], "out");
}

#[tokio::test]
async fn test_process_lifecycle_scenario() {
    let app = setup();
    deposit(&app, 12.0, 10.0).await;
    deposit(&app, 12.0, 5.0).await;

    let (status, process) = create_process(&app, "Cut A", 12.0).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(process["status"], "in-progress");
    assert_eq!(available(&app, 12.0).await, 3.0);

    let id = process["id"].as_str().unwrap().to_string();
    let outputs = json!({
        "finishedGoods": { "count": 8, "weightPerItem": 1.0 },
        "weightLoss": { "weight": 1.0 }
    });

    let (status, preview) = send(
        &app,
        "POST",
        &format!("/processes/{id}/preview"),
        Some(outputs.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["leftoverWeight"], 3.0);
    assert_eq!(available(&app, 12.0).await, 3.0);

    let mut body = outputs.clone();
    body["addLeftoverToStock"] = json!(true);
    let (status, finalized) = send(
        &app,
        "POST",
        &format!("/processes/{id}/finalize"),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{finalized}");
    assert_eq!(finalized["process"]["status"], "completed");
    assert_eq!(finalized["summary"]["remainingWeight"], 3.0);
    assert_eq!(finalized["leftover"]["weight"], 3.0);
    assert_eq!(available(&app, 12.0).await, 6.0);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/processes/{id}/finalize"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].is_string());

    let (status, history) = send(&app, "GET", "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let lines: Vec<(String, f64)> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|l| {
            (
                l["type"].as_str().unwrap().to_string(),
                l["weight"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            ("in".to_string(), 10.0),
            ("in".to_string(), 5.0),
            ("out".to_string(), 12.0),
            ("in".to_string(), 3.0),
        ]
    );

    let (_, outs) = send(&app, "GET", "/history?type=out", None).await;
    assert_eq!(outs.as_array().unwrap().len(), 1);
    assert_eq!(outs[0]["processId"], id.as_str());
}

#[tokio::test]
async fn test_second_process_over_stock_reserves_nothing() {
    let app = setup();
    deposit(&app, 12.0, 10.0).await;

    let (status, _) = create_process(&app, "First", 8.0).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = create_process(&app, "Second", 5.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("Insufficient stock"));
    assert_eq!(available(&app, 12.0).await, 2.0);

    let (_, processes) = send(&app, "GET", "/processes?status=in-progress", None).await;
    assert_eq!(processes.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reused_process_number_conflicts() {
    let app = setup();
    deposit(&app, 12.0, 10.0).await;
    let body = json!({
        "name": "Batch",
        "processId": "PROC-7",
        "diameter": 12,
        "weightUsed": 2.0,
        "bladeDiameter": 3,
        "numberOfRods": 2
    });

    let (status, _) = send(&app, "POST", "/processes", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, "POST", "/processes", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("PROC-7"));
    assert_eq!(available(&app, 12.0).await, 8.0);
}

#[tokio::test]
async fn test_unknown_process_is_not_found() {
    let app = setup();

    let (status, _) = send(&app, "GET", "/processes/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/processes/missing/finalize",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_internal_and_atomic() {
    let (app, store) = setup_with_store();
    deposit(&app, 12.0, 10.0).await;

    store.fail_next_commit();
    let (status, json) = create_process(&app, "Doomed", 4.0).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());

    assert_eq!(available(&app, 12.0).await, 10.0);
    let (_, processes) = send(&app, "GET", "/processes", None).await;
    assert_eq!(processes, json!([]));
}

#[tokio::test]
async fn test_groups_and_filtered_reports() {
    let app = setup();
    deposit(&app, 12.0, 30.0).await;

    let mut ids = Vec::new();
    for name in ["Batch A", "Batch B"] {
        let (_, process) = create_process(&app, name, 10.0).await;
        let id = process["id"].as_str().unwrap().to_string();
        let (status, _) = send(
            &app,
            "POST",
            &format!("/processes/{id}/finalize"),
            Some(json!({
                "finishedGoods": { "count": 8, "weightPerItem": 1.0 },
                "weightLoss": { "weight": 1.0 }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(id);
    }

    let (status, group) = send(
        &app,
        "POST",
        "/groups",
        Some(json!({ "name": "Week 1", "processIds": [ids[1]] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = group["id"].as_str().unwrap().to_string();

    let (status, report) = send(&app, "GET", "/reports/process-details", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["kind"], "process-details");
    assert_eq!(report["rows"].as_array().unwrap().len(), 2);
    assert_eq!(report["rows"][0]["efficiency"], 80.0);

    let (_, report) = send(
        &app,
        "GET",
        &format!("/reports/finished-goods?group={group_id}"),
        None,
    )
    .await;
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["processName"], "Batch B");

    let (_, report) = send(
        &app,
        "GET",
        &format!("/reports/finished-goods?process={}&group={group_id}", ids[0]),
        None,
    )
    .await;
    assert_eq!(report["rows"][0]["processName"], "Batch A");

    let (status, group) = send(
        &app,
        "PUT",
        &format!("/groups/{group_id}"),
        Some(json!({ "name": "Week 2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["name"], "Week 2");
    assert_eq!(group["processIds"], json!([ids[1]]));

    let (status, _) = send(&app, "DELETE", &format!("/groups/{group_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/reports/rejected?group={group_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_group_and_unknown_report() {
    let app = setup();

    let (status, _) = send(
        &app,
        "POST",
        "/groups",
        Some(json!({ "name": "  ", "processIds": ["p1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app, "GET", "/reports/inventory", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("inventory"));

    let (status, kinds) = send(&app, "GET", "/reports", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kinds.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_blade_diameters_register_once() {
    let app = setup();

    let (status, json) = send(
        &app,
        "POST",
        "/blade-diameters",
        Some(json!({ "diameter": 3.2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["created"], true);

    let (status, json) = send(
        &app,
        "POST",
        "/blade-diameters",
        Some(json!({ "diameter": 3.2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["created"], false);

    let (_, list) = send(&app, "GET", "/blade-diameters", None).await;
    assert_eq!(list, json!([3.2]));
}

#[tokio::test]
async fn test_export_import_roundtrip() {
    let source = setup();
    deposit(&source, 12.0, 10.0).await;
    let (_, process) = create_process(&source, "Cut", 4.0).await;
    assert_eq!(process["status"], "in-progress");

    let (status, snapshot) = send(&source, "GET", "/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["rods"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["processes"].as_array().unwrap().len(), 1);

    let target = setup();
    let (status, json) = send(&target, "POST", "/import", Some(snapshot.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["records"].as_u64().unwrap() > 0);

    let (_, exported) = send(&target, "GET", "/export", None).await;
    assert_eq!(exported, snapshot);
    assert_eq!(available(&target, 12.0).await, 6.0);
}

#[tokio::test]
async fn test_invalid_import_changes_nothing() {
    let app = setup();
    deposit(&app, 12.0, 10.0).await;

    let (status, json) = send(
        &app,
        "POST",
        "/import",
        Some(json!({ "rods": [], "orders": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid snapshot"));

    assert_eq!(available(&app, 12.0).await, 10.0);
}
