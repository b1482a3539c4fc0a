use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::definitions::DashboardKind;
use super::service::{DashboardRequest, DashboardResponse, DashboardService};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    risk_limit: Option<usize>,
}

/// Router builder exposing the dashboard catalogue and per-dashboard results.
pub fn dashboard_router(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/v1/dashboards", get(list_handler))
        .route(
            "/api/v1/dashboards/:dashboard",
            get(file_handler).post(inline_handler),
        )
        .with_state(service)
}

pub(crate) async fn list_handler(
    State(service): State<Arc<DashboardService>>,
) -> Json<serde_json::Value> {
    Json(json!({ "dashboards": service.listings() }))
}

pub(crate) async fn file_handler(
    State(service): State<Arc<DashboardService>>,
    Path(dashboard): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let kind: DashboardKind = dashboard.parse()?;
    let request = DashboardRequest {
        risk_limit: query.risk_limit,
        ..DashboardRequest::default()
    };
    Ok(Json(service.build(kind, request)?))
}

pub(crate) async fn inline_handler(
    State(service): State<Arc<DashboardService>>,
    Path(dashboard): Path<String>,
    Json(request): Json<DashboardRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let kind: DashboardKind = dashboard.parse()?;
    Ok(Json(service.build(kind, request)?))
}
