use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tabular_insights::dashboards::{dashboard_router, DashboardService, DashboardSettings};
use tower::ServiceExt;

fn router() -> axum::Router {
    dashboard_router(Arc::new(DashboardService::new(DashboardSettings {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data"),
        risk_limit: 3,
        jitter_amplitude: 0.0,
    })))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = router().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("payload encodes")))
        .expect("request builds")
}

#[tokio::test]
async fn telecom_dashboard_serves_sample_file() {
    let (status, body) = send(
        Request::get("/api/v1/dashboards/telecom")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data_source"], "data_file");
    assert_eq!(body["dashboard_label"], "Telecom Churn");
    assert_eq!(body["record_count"], 25);
    assert_eq!(body["risk_list"].as_array().unwrap().len(), 3);
    assert!(body.get("warning").is_none());

    let churn: Vec<&str> = body["groups"]["churn"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["label"].as_str().unwrap())
        .collect();
    assert_eq!(churn, vec!["Yes", "No"]);
}

#[tokio::test]
async fn inline_records_override_data_file() {
    let payload = json!({
        "records": [
            { "EmployeeNumber": 1, "Department": "Sales", "Attrition": "Yes", "OverTime": "Yes" },
            { "EmployeeNumber": 2, "Department": "Sales", "Attrition": "No", "OverTime": "Yes", "YearsAtCompany": 1 },
            { "EmployeeNumber": 3, "Department": "Sales", "Attrition": "No", "OverTime": "No", "YearsAtCompany": 9 },
            { "EmployeeNumber": 4, "Department": "Research & Development", "Attrition": "No", "YearsAtCompany": 4 }
        ],
        "risk_limit": 10
    });

    let (status, body) = send(post_json("/api/v1/dashboards/hr", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data_source"], "inline");
    assert_eq!(body["record_count"], 4);
    assert_eq!(body["kpis"]["attrition_rate"], 0.25);

    let risk = body["risk_list"].as_array().unwrap();
    assert_eq!(risk.len(), 3);
    // Sales rate 1/3 = 33.3 points, plus overtime and short tenure.
    assert_eq!(risk[0]["record"]["EmployeeNumber"], 2.0);
    let top = risk[0]["score"].as_f64().unwrap();
    assert!((top - (100.0 / 3.0 + 13.0)).abs() < 1e-9);
    assert_eq!(risk[0]["tier_label"], "High");
}

#[tokio::test]
async fn unknown_dashboard_returns_not_found() {
    let (status, body) = send(post_json("/api/v1/dashboards/payroll", &json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("payroll"));
}
