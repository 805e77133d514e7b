//! Maintenance telemetry and risk planning endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use medfleet_core::{MaintenanceLog, PlanRequest};

use crate::engine::EngineError;
use crate::export;
use crate::state::AppState;

fn error_response(err: EngineError) -> axum::response::Response {
    let status = match err {
        EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        EngineError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

pub async fn record_log(
    State(state): State<Arc<AppState>>,
    Json(log): Json<MaintenanceLog>,
) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match state.engine.record_log(log, &fleet) {
        Ok(plan) => Json(plan).into_response(),
        Err(err) => error_response(err),
    }
}

/// Batch planning. The body is optional: no body means "plan the whole
/// fleet with the insight attached".
pub async fn plan(
    State(state): State<Arc<AppState>>,
    request: Option<Json<PlanRequest>>,
) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match state.engine.plan(request.map(|Json(r)| r), &fleet) {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match state.engine.fleet_summary(&fleet) {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<String>,
) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match state.engine.snapshot(&drone_id, &fleet) {
        Some(plan) => Json(plan).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Unknown drone", "droneId": drone_id})),
        )
            .into_response(),
    }
}

pub async fn export_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match state.engine.fleet_summary(&fleet) {
        Ok(response) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"fleet-maintenance.json\"",
                ),
            ],
            export::export_json(&response),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn export_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match state.engine.fleet_summary(&fleet) {
        Ok(response) => (
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"fleet-maintenance.csv\"",
                ),
            ],
            export::export_csv(&response),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
