//! Maintenance engine: owns the log store and derives risk plans.
//!
//! All mutation runs a read-entire -> mutate -> write-entire cycle under one
//! lock so concurrent writers cannot interleave and lose an append. Snapshot
//! reads take the same lock per read only, never across a planning call.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use medfleet_core::models::LogHistory;
use medfleet_core::{
    build_insight, build_plan, Drone, MaintenanceLog, MaintenancePlan, PlanRequest, PlanResponse,
    RiskLevel,
};

use crate::persistence::LogStore;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("maintenance storage unavailable")]
    Storage(#[from] anyhow::Error),
}

/// Injected clock so recording is deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct MaintenanceEngine {
    store: Mutex<Box<dyn LogStore>>,
    clock: Arc<dyn Clock>,
}

impl MaintenanceEngine {
    pub fn new(store: Box<dyn LogStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
        }
    }

    /// Record one telemetry entry and return the recomputed plan.
    ///
    /// Rejects a blank drone id before anything is persisted. batteryHealth
    /// is clamped and recordedAt filled from the clock when absent.
    pub fn record_log(
        &self,
        mut log: MaintenanceLog,
        fleet: &[Drone],
    ) -> Result<MaintenancePlan, EngineError> {
        if log.drone_id.trim().is_empty() {
            return Err(EngineError::InvalidArgument("droneId is required"));
        }
        self.prepare(&mut log);

        let store = self.store.lock().expect("maintenance store lock");
        let mut history = store.load();
        let logs = history.entry(log.drone_id.clone()).or_default();
        logs.push(log.clone());
        store.persist(&history)?;

        let plan = build_plan(
            &log.drone_id,
            history.get(&log.drone_id).map_or(&[], Vec::as_slice),
            capability_of(fleet, &log.drone_id),
        );
        drop(store);

        alert_if_high_risk(&plan);
        Ok(plan)
    }

    /// Batch planning: optionally ingest new logs, then build a plan per
    /// target drone (explicit ids, or everything known to store/registry).
    pub fn plan(
        &self,
        request: Option<PlanRequest>,
        fleet: &[Drone],
    ) -> Result<PlanResponse, EngineError> {
        let store = self.store.lock().expect("maintenance store lock");
        let mut history = store.load();

        let new_logs = request
            .as_ref()
            .and_then(|r| r.new_logs.as_ref())
            .map_or(&[][..], Vec::as_slice);
        if !new_logs.is_empty() {
            for log in new_logs {
                // Invalid entries are skipped, not rejected.
                if log.drone_id.trim().is_empty() {
                    continue;
                }
                let mut log = log.clone();
                self.prepare(&mut log);
                history.entry(log.drone_id.clone()).or_default().push(log);
            }
            store.persist(&history)?;
        }
        drop(store);

        let targets = determine_targets(request.as_ref(), &history, fleet);
        let plans: Vec<MaintenancePlan> = targets
            .iter()
            .map(|id| {
                build_plan(
                    id,
                    history.get(id).map_or(&[], Vec::as_slice),
                    capability_of(fleet, id),
                )
            })
            .collect();

        for plan in &plans {
            alert_if_high_risk(plan);
        }

        let include_insight = request.map_or(true, |r| r.include_fleet_insight);
        let insight = include_insight.then(|| build_insight(&plans));

        Ok(PlanResponse { plans, insight })
    }

    /// Full fleet summary with the insight always attached.
    pub fn fleet_summary(&self, fleet: &[Drone]) -> Result<PlanResponse, EngineError> {
        self.plan(
            Some(PlanRequest {
                drone_ids: None,
                new_logs: None,
                include_fleet_insight: true,
            }),
            fleet,
        )
    }

    /// Current plan for one drone; None for a blank id. A drone with no
    /// history still gets a plan (built from inferred defaults).
    pub fn snapshot(&self, drone_id: &str, fleet: &[Drone]) -> Option<MaintenancePlan> {
        if drone_id.trim().is_empty() {
            return None;
        }
        let history = self.store.lock().expect("maintenance store lock").load();
        Some(build_plan(
            drone_id,
            history.get(drone_id).map_or(&[], Vec::as_slice),
            capability_of(fleet, drone_id),
        ))
    }

    /// Read-only copy of the full log history.
    pub fn history(&self) -> LogHistory {
        self.store.lock().expect("maintenance store lock").load()
    }

    fn prepare(&self, log: &mut MaintenanceLog) {
        log.clamp_battery();
        if log.recorded_at.as_deref().map_or(true, str::is_empty) {
            log.recorded_at = Some(self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
    }
}

fn capability_of<'a>(
    fleet: &'a [Drone],
    drone_id: &str,
) -> Option<&'a medfleet_core::DroneCapability> {
    fleet
        .iter()
        .find(|d| d.id == drone_id)
        .and_then(|d| d.capability.as_ref())
}

/// Explicit ids when given, otherwise the union of stored and registry-known
/// drones; blank ids dropped, result sorted.
fn determine_targets(
    request: Option<&PlanRequest>,
    history: &LogHistory,
    fleet: &[Drone],
) -> Vec<String> {
    let mut targets: BTreeSet<String> = BTreeSet::new();

    if let Some(ids) = request.and_then(|r| r.drone_ids.as_ref()) {
        targets.extend(ids.iter().cloned());
    }
    if targets.is_empty() {
        targets.extend(history.keys().cloned());
        targets.extend(fleet.iter().map(|d| d.id.clone()));
    }

    targets
        .into_iter()
        .filter(|id| !id.trim().is_empty())
        .collect()
}

fn alert_if_high_risk(plan: &MaintenancePlan) {
    if plan.risk_level != RiskLevel::High {
        return;
    }
    tracing::warn!(
        "[HIGH RISK ALERT] Drone {}: risk score {:.1}/100, hours until service: {:.1}, recommendation: {}",
        plan.drone_id,
        plan.risk_score,
        plan.hours_until_service,
        plan.recommendation
    );
    if !plan.contributing_factors.is_empty() {
        tracing::warn!(
            "  Contributing factors: {}",
            plan.contributing_factors.join(", ")
        );
    }
}
