//! Core data models for the medfleet dispatch system.
//!
//! Wire names are camelCase to match the fleet registry JSON and the
//! persisted maintenance store layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full maintenance history: drone id -> logs in recording order.
pub type LogHistory = BTreeMap<String, Vec<MaintenanceLog>>;

/// One maintenance telemetry entry for a drone.
///
/// Identity is (droneId, recordedAt) and is used for equality only;
/// duplicate entries with distinct timestamps accumulate in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceLog {
    pub drone_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_diversions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_payload_kg: Option<f64>,
    /// Battery health in [0,1]; clamped before storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_health: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_issues: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// ISO-8601 timestamp, filled in at record time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl MaintenanceLog {
    pub fn new(drone_id: impl Into<String>) -> Self {
        Self {
            drone_id: drone_id.into(),
            flight_hours: None,
            missions: None,
            emergency_diversions: None,
            avg_payload_kg: None,
            battery_health: None,
            temperature_alerts: None,
            communication_issues: None,
            note: None,
            recorded_at: None,
        }
    }

    /// Clamp batteryHealth into [0,1]. Applied to every entry before it is
    /// appended to the store.
    pub fn clamp_battery(&mut self) {
        if let Some(health) = self.battery_health {
            self.battery_health = Some(health.clamp(0.0, 1.0));
        }
    }
}

/// Static operating envelope of a drone, supplied by the fleet registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneCapability {
    pub capacity: f64,
    #[serde(default)]
    pub cooling: bool,
    #[serde(default)]
    pub heating: bool,
    pub max_moves: f64,
    pub cost_initial: f64,
    pub cost_final: f64,
    pub cost_per_move: f64,
}

impl DroneCapability {
    pub fn supports_capacity(&self, required: f64) -> bool {
        self.capacity >= required
    }

    pub fn supports_temperature(&self, cooling: bool, heating: bool) -> bool {
        (!cooling || self.cooling) && (!heating || self.heating)
    }
}

/// Weekly availability window. Day and times arrive as strings
/// ("MONDAY", "09:00") and are parsed lazily during matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyWindow {
    pub day: String,
    pub from: String,
    pub to: String,
}

/// A drone as described by the fleet registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<DroneCapability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekly_availabilities: Vec<WeeklyWindow>,
}

/// Risk classification with fixed score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// score >= 70 -> HIGH, score >= 40 -> MEDIUM, else LOW.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            RiskLevel::High
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Derived maintenance assessment for one drone. Never persisted;
/// recomputed from the log history on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePlan {
    pub drone_id: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub hours_until_service: f64,
    pub mission_buffer: u32,
    pub recommendation: String,
    pub contributing_factors: Vec<String>,
}

/// Fleet-level aggregate over a set of maintenance plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetInsight {
    pub average_risk: f64,
    pub fleet_size: usize,
    pub high_risk: usize,
    pub readiness_percent: f64,
    pub narrative: Vec<String>,
}

/// Batch maintenance planning request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drone_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_logs: Option<Vec<MaintenanceLog>>,
    #[serde(default)]
    pub include_fleet_insight: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub plans: Vec<MaintenancePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<FleetInsight>,
}

/// Requirements attached to a single dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequirements {
    pub capacity: f64,
    #[serde(default)]
    pub cooling: bool,
    #[serde(default)]
    pub heating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
}

/// A single delivery dispatch with its scheduled slot and requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<DispatchRequirements>,
}

impl Dispatch {
    pub fn required_capacity(&self) -> f64 {
        self.requirements.as_ref().map_or(0.0, |r| r.capacity)
    }

    pub fn need_cooling(&self) -> bool {
        self.requirements.as_ref().is_some_and(|r| r.cooling)
    }

    pub fn need_heating(&self) -> bool {
        self.requirements.as_ref().is_some_and(|r| r.heating)
    }

    pub fn max_cost(&self) -> Option<f64> {
        self.requirements.as_ref().and_then(|r| r.max_cost)
    }
}

/// Longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Flight segment assigned to one dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFlight {
    pub delivery_id: i64,
    pub flight_path: Vec<Position>,
}

/// All per-dispatch segments flown by one drone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DronePath {
    pub drone_id: String,
    pub deliveries: Vec<DeliveryFlight>,
}

/// Result of planning a dispatch batch. Built fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPath {
    pub total_cost: f64,
    pub total_moves: u32,
    pub drone_paths: Vec<DronePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_plan: Option<MaintenancePlan>,
}

impl DeliveryPath {
    /// Zero sentinel: distinguishes "no feasible assignment" from failure.
    pub fn empty() -> Self {
        Self {
            total_cost: 0.0,
            total_moves: 0,
            drone_paths: Vec::new(),
            maintenance_plan: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.drone_paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_thresholds_are_exact_at_boundaries() {
        assert_eq!(RiskLevel::from_score(39.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::High);
    }

    #[test]
    fn battery_health_clamps_into_unit_interval() {
        let mut log = MaintenanceLog::new("D1");
        log.battery_health = Some(1.7);
        log.clamp_battery();
        assert_eq!(log.battery_health, Some(1.0));

        log.battery_health = Some(-0.2);
        log.clamp_battery();
        assert_eq!(log.battery_health, Some(0.0));

        log.battery_health = None;
        log.clamp_battery();
        assert_eq!(log.battery_health, None);
    }

    #[test]
    fn registry_drone_deserializes_from_camel_case() {
        let json = r#"{
            "id": "DRONE-7",
            "name": "Heron",
            "capability": {
                "capacity": 30.0,
                "cooling": true,
                "heating": false,
                "maxMoves": 120.0,
                "costInitial": 10.0,
                "costFinal": 10.0,
                "costPerMove": 1.0
            },
            "weeklyAvailabilities": [
                {"day": "MONDAY", "from": "09:00", "to": "17:00"}
            ]
        }"#;
        let drone: Drone = serde_json::from_str(json).unwrap();
        assert_eq!(drone.id, "DRONE-7");
        let cap = drone.capability.unwrap();
        assert!(cap.cooling);
        assert_eq!(cap.max_moves, 120.0);
        assert_eq!(drone.weekly_availabilities.len(), 1);
    }

    #[test]
    fn maintenance_log_round_trips_optional_fields() {
        let json = r#"{"droneId":"D1","flightHours":2.5,"batteryHealth":0.8}"#;
        let log: MaintenanceLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.flight_hours, Some(2.5));
        assert_eq!(log.missions, None);

        let back = serde_json::to_string(&log).unwrap();
        assert!(back.contains("\"droneId\":\"D1\""));
        assert!(!back.contains("missions"));
    }
}
