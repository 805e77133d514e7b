//! Dispatch batch planning endpoints.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use std::sync::Arc;

use medfleet_core::{delivery_path_geojson, plan_delivery, DeliveryPath, Dispatch};

use crate::state::AppState;

pub async fn delivery_path(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<Dispatch>>,
) -> Json<DeliveryPath> {
    let fleet = state.registry.fetch_drones().await;
    Json(plan_delivery(&dispatches, &fleet, |id| {
        state.engine.snapshot(id, &fleet)
    }))
}

pub async fn delivery_path_geojson_route(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<Dispatch>>,
) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    let geojson = delivery_path_geojson(&dispatches, &fleet, |id| {
        state.engine.snapshot(id, &fleet)
    });
    ([(header::CONTENT_TYPE, "application/geo+json")], geojson)
}
