//! Maintenance risk scoring.
//!
//! `build_plan` is a pure function of (log history, capability): every query
//! recomputes the plan from scratch, nothing here is persisted.

use crate::models::{DroneCapability, FleetInsight, MaintenanceLog, MaintenancePlan, RiskLevel};

/// Capacity assumed when the registry does not know the drone.
pub const DEFAULT_CAPACITY: f64 = 25.0;
/// Move budget assumed when the registry does not know the drone.
pub const DEFAULT_MAX_MOVES: f64 = 60.0;

/// Round to one decimal, matching the wire precision of risk scores.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Build the maintenance plan for one drone from its full log history.
pub fn build_plan(
    drone_id: &str,
    logs: &[MaintenanceLog],
    capability: Option<&DroneCapability>,
) -> MaintenancePlan {
    let mut factors: Vec<String> = Vec::new();

    let mut hours: f64 = logs.iter().filter_map(|l| l.flight_hours).sum();
    let mut missions: f64 = logs.iter().filter_map(|l| l.missions).map(f64::from).sum();
    let emergency: f64 = logs
        .iter()
        .filter_map(|l| l.emergency_diversions)
        .map(f64::from)
        .sum();

    let payloads: Vec<f64> = logs.iter().filter_map(|l| l.avg_payload_kg).collect();
    let mut payload_average = if payloads.is_empty() {
        0.0
    } else {
        payloads.iter().sum::<f64>() / payloads.len() as f64
    };

    let batteries: Vec<f64> = logs.iter().filter_map(|l| l.battery_health).collect();
    let battery_average = if batteries.is_empty() {
        0.85
    } else {
        batteries.iter().sum::<f64>() / batteries.len() as f64
    };

    let temperature_issues = logs.iter().any(|l| l.temperature_alerts == Some(true));
    let comms_issues = logs.iter().any(|l| l.communication_issues == Some(true));

    let (capacity, max_moves) = match capability {
        Some(cap) => (cap.capacity, cap.max_moves),
        None => (DEFAULT_CAPACITY, DEFAULT_MAX_MOVES),
    };

    if logs.is_empty() {
        // No telemetry yet - assume light utilization.
        hours = max_moves * 0.15;
        missions = 8.0;
        payload_average = capacity * 0.4;
        factors.push("Using inferred utilization because no telemetry logs were found".to_string());
    }

    let utilization = clamp01(hours / max_moves.max(1.0));
    let mission_factor = clamp01(missions / 30.0);
    let emergency_factor = clamp01(emergency / 5.0);
    let payload_factor = clamp01(payload_average / capacity.max(1.0));
    let battery_stress = clamp01(1.0 - battery_average);

    let risk_score = 30.0 * utilization
        + 20.0 * mission_factor
        + 15.0 * payload_factor
        + 15.0 * emergency_factor
        + 10.0 * battery_stress
        + if temperature_issues { 5.0 } else { 0.0 }
        + if comms_issues { 5.0 } else { 0.0 };

    let risk_level = RiskLevel::from_score(risk_score);
    let hours_until_service = (max_moves * 0.9 - hours).max(0.0);
    let mission_buffer = (20.0 - missions * 0.5).round().max(0.0) as u32;

    if utilization > 0.75 {
        factors.push("Sustained utilization above 75%".to_string());
    }
    if mission_factor > 0.65 {
        factors.push("Dense mission schedule in current window".to_string());
    }
    if payload_factor > 0.7 {
        factors.push("Payload levels trending near capacity".to_string());
    }
    if emergency_factor > 0.2 {
        factors.push("Multiple emergency diversions logged".to_string());
    }
    if battery_stress > 0.4 {
        factors.push("Battery health degradation detected".to_string());
    }
    if temperature_issues {
        factors.push("Cold-chain / thermal anomaly reported".to_string());
    }
    if comms_issues {
        factors.push("Communication dropouts observed".to_string());
    }

    MaintenancePlan {
        drone_id: drone_id.to_string(),
        risk_score: round1(risk_score),
        risk_level,
        hours_until_service: round1(hours_until_service),
        mission_buffer,
        recommendation: recommendation(risk_level, hours_until_service),
        contributing_factors: factors,
    }
}

fn recommendation(level: RiskLevel, hours_until_service: f64) -> String {
    match level {
        RiskLevel::High => "Ground immediately and schedule engineering review.".to_string(),
        RiskLevel::Medium => {
            if hours_until_service < 10.0 {
                "Schedule service before the next dispatch block.".to_string()
            } else {
                "Line up maintenance within the next 2 rotations.".to_string()
            }
        }
        RiskLevel::Low => "Cleared to fly; monitor telemetry after each sortie.".to_string(),
    }
}

/// Aggregate a set of plans into a fleet-level insight.
pub fn build_insight(plans: &[MaintenancePlan]) -> FleetInsight {
    if plans.is_empty() {
        return FleetInsight {
            average_risk: 0.0,
            fleet_size: 0,
            high_risk: 0,
            readiness_percent: 0.0,
            narrative: vec!["No maintenance telemetry available yet.".to_string()],
        };
    }

    let fleet_size = plans.len();
    let average = plans.iter().map(|p| p.risk_score).sum::<f64>() / fleet_size as f64;
    let high_risk = plans
        .iter()
        .filter(|p| p.risk_level == RiskLevel::High)
        .count();
    let readiness = 100.0 * (fleet_size - high_risk) as f64 / fleet_size as f64;

    let mut ranked: Vec<&MaintenancePlan> = plans.iter().collect();
    ranked.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut narrative: Vec<String> = ranked
        .iter()
        .take(3)
        .map(|p| {
            let level = match p.risk_level {
                RiskLevel::Low => "LOW",
                RiskLevel::Medium => "MEDIUM",
                RiskLevel::High => "HIGH",
            };
            format!(
                "{} -> {} risk, recommend: {}",
                p.drone_id, level, p.recommendation
            )
        })
        .collect();

    if high_risk > 0 {
        narrative.push("Ground the flagged drones before the next dispatch cycle.".to_string());
    } else {
        narrative.push("Fleet ready for the next window; keep logging telemetry.".to_string());
    }

    FleetInsight {
        average_risk: round1(average),
        fleet_size,
        high_risk,
        readiness_percent: round1(readiness),
        narrative,
    }
}
