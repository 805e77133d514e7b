//! REST API router.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{delivery, drones, geometry, maintenance};
use crate::state::AppState;

/// Create the API router. Everything hangs under /api/v1.
pub fn create_router() -> Router<Arc<AppState>> {
    let v1 = Router::new()
        .route("/version", get(version))
        // Fleet registry views
        .route("/drones", get(drones::list_drones))
        .route("/drones/cooling/:state", get(drones::drones_with_cooling))
        .route("/drones/query/:attribute/:value", get(drones::query_as_path))
        .route("/drones/query", post(drones::query_drones))
        .route("/drones/available", post(drones::available_drones))
        .route("/drones/:drone_id", get(drones::get_drone))
        // Dispatch planning
        .route("/delivery/path", post(delivery::delivery_path))
        .route(
            "/delivery/path/geojson",
            post(delivery::delivery_path_geojson_route),
        )
        // Maintenance / fleet risk
        .route("/maintenance/log", post(maintenance::record_log))
        .route("/maintenance/plan", post(maintenance::plan))
        .route("/maintenance/summary", get(maintenance::summary))
        .route("/maintenance/export/json", get(maintenance::export_json))
        .route("/maintenance/export/csv", get(maintenance::export_csv))
        .route("/maintenance/:drone_id", get(maintenance::snapshot))
        // Stateless geometry helpers
        .route("/geo/distance", post(geometry::distance_to))
        .route("/geo/close", post(geometry::is_close_to))
        .route("/geo/next-position", post(geometry::next_position))
        .route("/geo/in-region", post(geometry::is_in_region));

    Router::new().nest("/api/v1", v1)
}

async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
