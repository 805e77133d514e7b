//! API routes for the medfleet server.

pub mod delivery;
pub mod drones;
pub mod geometry;
pub mod maintenance;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
