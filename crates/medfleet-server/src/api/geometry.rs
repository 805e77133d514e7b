//! Stateless geometry utility endpoints.

use axum::Json;
use serde::Deserialize;

use medfleet_core::geo;
use medfleet_core::Position;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRequest {
    pub position1: Position,
    pub position2: Position,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPositionRequest {
    pub start: Position,
    pub angle: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub vertices: Vec<Position>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRequest {
    pub position: Position,
    pub region: Region,
}

pub async fn distance_to(Json(request): Json<DistanceRequest>) -> Json<f64> {
    Json(geo::distance(request.position1, request.position2))
}

pub async fn is_close_to(Json(request): Json<DistanceRequest>) -> Json<bool> {
    Json(geo::is_close(request.position1, request.position2))
}

pub async fn next_position(Json(request): Json<NextPositionRequest>) -> Json<Position> {
    Json(geo::next_position(request.start, request.angle))
}

pub async fn is_in_region(Json(request): Json<RegionRequest>) -> Json<bool> {
    Json(geo::is_in_region(request.position, &request.region.vertices))
}
