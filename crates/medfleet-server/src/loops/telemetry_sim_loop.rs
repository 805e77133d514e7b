//! Synthetic maintenance telemetry loop.
//!
//! When enabled, periodically manufactures plausible log entries for a
//! sample of the fleet and records them through the engine, exactly as an
//! external caller would. Purely a demo/ops aid; disabled by default.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::interval;

use medfleet_core::{Drone, MaintenanceLog};

use crate::state::AppState;

/// Sample size per tick; keeps simulated history small even on big fleets.
const SAMPLE_PER_TICK: usize = 5;

pub async fn run_telemetry_sim_loop(state: Arc<AppState>, interval_ms: u64) {
    tracing::info!(
        "Starting maintenance telemetry simulator (interval={} ms)",
        interval_ms
    );
    let mut ticker = interval(Duration::from_millis(interval_ms.max(1)));
    // The first tick fires immediately; skip it so the simulator waits a
    // full interval before emitting anything.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        emit_telemetry(&state).await;
    }
}

async fn emit_telemetry(state: &AppState) {
    let fleet = state.registry.fetch_drones().await;
    if fleet.is_empty() {
        return;
    }

    let sample: Vec<&Drone> = fleet.iter().take(SAMPLE_PER_TICK).collect();
    let mut recorded = 0usize;
    for drone in &sample {
        let log = build_log(drone);
        match state.engine.record_log(log, &fleet) {
            Ok(_) => recorded += 1,
            Err(err) => {
                tracing::warn!("Failed to record simulated telemetry: {}", err);
            }
        }
    }
    tracing::debug!("Simulated telemetry for {} drones", recorded);
}

fn build_log(drone: &Drone) -> MaintenanceLog {
    let mut rng = rand::rng();
    let capacity = drone
        .capability
        .as_ref()
        .map(|c| c.capacity)
        .filter(|c| *c > 0.0)
        .unwrap_or(20.0);

    let mut log = MaintenanceLog::new(&drone.id);
    log.flight_hours = Some(round2(rng.random_range(0.5..3.5)));
    log.missions = Some(rng.random_range(1..5));
    log.emergency_diversions = Some(if rng.random::<f64>() > 0.85 { 1 } else { 0 });
    log.avg_payload_kg = Some(round2(rng.random_range(capacity * 0.3..capacity * 0.9)));
    log.battery_health = Some(round2(rng.random_range(0.6..0.95)));
    log.temperature_alerts = Some(rng.random::<f64>() > 0.9);
    log.communication_issues = Some(rng.random::<f64>() > 0.92);
    log.note = Some("Simulated telemetry tick".to_string());
    log
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use medfleet_core::DroneCapability;

    #[test]
    fn simulated_log_stays_within_plausible_ranges() {
        let drone = Drone {
            id: "SIM-1".to_string(),
            name: None,
            capability: Some(DroneCapability {
                capacity: 20.0,
                cooling: false,
                heating: false,
                max_moves: 60.0,
                cost_initial: 1.0,
                cost_final: 1.0,
                cost_per_move: 1.0,
            }),
            weekly_availabilities: Vec::new(),
        };

        for _ in 0..50 {
            let log = build_log(&drone);
            assert_eq!(log.drone_id, "SIM-1");
            let hours = log.flight_hours.unwrap();
            assert!((0.5..=3.5).contains(&hours));
            let payload = log.avg_payload_kg.unwrap();
            assert!((6.0..=18.0).contains(&payload));
            let battery = log.battery_health.unwrap();
            assert!((0.6..=0.95).contains(&battery));
            assert!((1..=4).contains(&log.missions.unwrap()));
        }
    }

    #[test]
    fn unknown_capacity_falls_back_to_default() {
        let drone = Drone {
            id: "SIM-2".to_string(),
            name: None,
            capability: None,
            weekly_availabilities: Vec::new(),
        };
        let log = build_log(&drone);
        let payload = log.avg_payload_kg.unwrap();
        assert!((6.0..=18.0).contains(&payload));
    }
}
