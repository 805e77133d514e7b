//! Shared application state.

use medfleet_registry::RegistryClient;

use crate::engine::MaintenanceEngine;

/// State injected into every route: the maintenance engine (sole owner of
/// the log store) and the fleet registry client.
pub struct AppState {
    pub engine: MaintenanceEngine,
    pub registry: RegistryClient,
}

impl AppState {
    pub fn new(engine: MaintenanceEngine, registry: RegistryClient) -> Self {
        Self { engine, registry }
    }
}
