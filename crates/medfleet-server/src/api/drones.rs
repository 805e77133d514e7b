//! Fleet registry views and capability queries.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use medfleet_core::{find_available_drones, Dispatch, Drone};

use crate::state::AppState;

/// One attribute filter: `{"attribute": "capacity", "operator": ">=", "value": "20"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCriteria {
    pub attribute: String,
    pub operator: String,
    pub value: String,
}

pub async fn list_drones(State(state): State<Arc<AppState>>) -> Json<Vec<Drone>> {
    Json(state.registry.fetch_drones().await)
}

pub async fn get_drone(
    State(state): State<Arc<AppState>>,
    Path(drone_id): Path<String>,
) -> impl IntoResponse {
    let fleet = state.registry.fetch_drones().await;
    match fleet.into_iter().find(|d| d.id == drone_id) {
        Some(drone) => Json(drone).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Unknown drone", "droneId": drone_id})),
        )
            .into_response(),
    }
}

pub async fn drones_with_cooling(
    State(state): State<Arc<AppState>>,
    Path(cooling): Path<bool>,
) -> Json<Vec<String>> {
    let fleet = state.registry.fetch_drones().await;
    let ids = fleet
        .into_iter()
        .filter(|d| d.capability.as_ref().is_some_and(|c| c.cooling == cooling))
        .map(|d| d.id)
        .collect();
    Json(ids)
}

pub async fn query_as_path(
    State(state): State<Arc<AppState>>,
    Path((attribute, value)): Path<(String, String)>,
) -> Json<Vec<String>> {
    let criteria = QueryCriteria {
        attribute,
        operator: "=".to_string(),
        value,
    };
    let fleet = state.registry.fetch_drones().await;
    Json(matching_ids(&fleet, std::slice::from_ref(&criteria)))
}

pub async fn query_drones(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<Vec<QueryCriteria>>,
) -> Json<Vec<String>> {
    let fleet = state.registry.fetch_drones().await;
    Json(matching_ids(&fleet, &criteria))
}

pub async fn available_drones(
    State(state): State<Arc<AppState>>,
    Json(dispatches): Json<Vec<Dispatch>>,
) -> Json<Vec<String>> {
    if dispatches.is_empty() {
        return Json(Vec::new());
    }
    let fleet = state.registry.fetch_drones().await;
    Json(find_available_drones(&dispatches, &fleet))
}

fn matching_ids(fleet: &[Drone], criteria: &[QueryCriteria]) -> Vec<String> {
    fleet
        .iter()
        .filter(|drone| criteria.iter().all(|c| match_criteria(drone, c)))
        .map(|drone| drone.id.clone())
        .collect()
}

/// Attribute values come in three shapes; numbers compare with a small
/// epsilon, booleans and strings only support (in)equality.
enum Actual {
    Text(String),
    Number(f64),
    Flag(bool),
}

fn match_criteria(drone: &Drone, criteria: &QueryCriteria) -> bool {
    let cap = drone.capability.as_ref();
    let actual = match criteria.attribute.to_lowercase().as_str() {
        "id" => Some(Actual::Text(drone.id.clone())),
        "name" => drone.name.clone().map(Actual::Text),
        "capacity" => cap.map(|c| Actual::Number(c.capacity)),
        "cooling" => cap.map(|c| Actual::Flag(c.cooling)),
        "heating" => cap.map(|c| Actual::Flag(c.heating)),
        "maxmoves" => cap.map(|c| Actual::Number(c.max_moves)),
        "costpermove" => cap.map(|c| Actual::Number(c.cost_per_move)),
        "costinitial" => cap.map(|c| Actual::Number(c.cost_initial)),
        "costfinal" => cap.map(|c| Actual::Number(c.cost_final)),
        _ => None,
    };
    let Some(actual) = actual else {
        return false;
    };

    let op = criteria.operator.as_str();
    match actual {
        Actual::Number(a) => {
            let Ok(b) = criteria.value.parse::<f64>() else {
                return false;
            };
            match op {
                "=" | "==" => (a - b).abs() < 1e-6,
                "!=" => (a - b).abs() > 1e-6,
                "<" => a < b,
                ">" => a > b,
                "<=" => a <= b,
                ">=" => a >= b,
                _ => false,
            }
        }
        Actual::Flag(a) => {
            let Ok(b) = criteria.value.parse::<bool>() else {
                return false;
            };
            match op {
                "=" | "==" => a == b,
                "!=" => a != b,
                _ => false,
            }
        }
        Actual::Text(a) => match op {
            "=" | "==" => a == criteria.value,
            "!=" => a != criteria.value,
            _ => false,
        },
    }
}
