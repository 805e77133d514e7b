//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub registry_url: String,
    pub storage_path: String,
    pub simulator_enabled: bool,
    pub simulator_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("MEDFLEET_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            registry_url: env::var("REGISTRY_URL")
                .unwrap_or_else(|_| "http://localhost:9000/api".to_string()),
            storage_path: env::var("MEDFLEET_STORAGE_PATH")
                .unwrap_or_else(|_| "storage/maintenance-log.json".to_string()),
            simulator_enabled: env::var("MEDFLEET_SIM_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            simulator_interval_ms: env::var("MEDFLEET_SIM_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60_000),
        }
    }
}
