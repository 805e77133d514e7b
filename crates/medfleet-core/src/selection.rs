//! Drone selection for a dispatch batch.
//!
//! Two-tier policy: the first pass skips HIGH-risk drones, the fallback pass
//! admits them. Within a pass every capable candidate is scored and the
//! strict maximum wins; ties keep the first candidate encountered.

use crate::models::{Dispatch, Drone, MaintenancePlan, RiskLevel};

/// Aggregated requirements of a whole batch.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BatchRequirements {
    capacity: f64,
    cooling: bool,
    heating: bool,
}

/// Sum capacity and OR the temperature flags across the batch.
/// Returns None when any dispatch is missing its requirements block;
/// a malformed batch fails selection as a whole.
fn aggregate(dispatches: &[Dispatch]) -> Option<BatchRequirements> {
    let mut total = BatchRequirements {
        capacity: 0.0,
        cooling: false,
        heating: false,
    };
    for dispatch in dispatches {
        let req = dispatch.requirements.as_ref()?;
        total.capacity += req.capacity;
        total.cooling |= req.cooling;
        total.heating |= req.heating;
    }
    Some(total)
}

/// Pick the best available drone for the batch.
///
/// `snapshot` supplies the current maintenance plan per drone id; selection
/// only reads it, it never mutates risk state.
pub fn select_drone<'a, F>(
    dispatches: &[Dispatch],
    drones: &'a [Drone],
    snapshot: F,
) -> Option<(&'a Drone, Option<MaintenancePlan>)>
where
    F: Fn(&str) -> Option<MaintenancePlan>,
{
    let needed = aggregate(dispatches)?;

    pick_candidate(drones, needed, &snapshot, false)
        .or_else(|| pick_candidate(drones, needed, &snapshot, true))
}

fn pick_candidate<'a, F>(
    drones: &'a [Drone],
    needed: BatchRequirements,
    snapshot: &F,
    allow_high_risk: bool,
) -> Option<(&'a Drone, Option<MaintenancePlan>)>
where
    F: Fn(&str) -> Option<MaintenancePlan>,
{
    let mut best: Option<(&Drone, Option<MaintenancePlan>)> = None;
    let mut best_score = f64::NEG_INFINITY;

    for drone in drones {
        let Some(cap) = drone.capability.as_ref() else {
            continue;
        };
        if !cap.supports_capacity(needed.capacity)
            || !cap.supports_temperature(needed.cooling, needed.heating)
        {
            continue;
        }

        let plan = snapshot(&drone.id);
        if !allow_high_risk
            && plan
                .as_ref()
                .is_some_and(|p| p.risk_level == RiskLevel::High)
        {
            continue;
        }

        let health_score = plan.as_ref().map_or(50.0, |p| 100.0 - p.risk_score);
        let buffer_score = plan.as_ref().map_or(0.0, |p| p.mission_buffer as f64 * 2.0);
        let capacity_score = cap.capacity * 0.1;
        let candidate_score = health_score + buffer_score + capacity_score;

        if candidate_score > best_score {
            best_score = candidate_score;
            best = Some((drone, plan));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DispatchRequirements, DroneCapability};

    fn drone(id: &str, capacity: f64, cooling: bool) -> Drone {
        Drone {
            id: id.to_string(),
            name: None,
            capability: Some(DroneCapability {
                capacity,
                cooling,
                heating: false,
                max_moves: 60.0,
                cost_initial: 10.0,
                cost_final: 10.0,
                cost_per_move: 1.0,
            }),
            weekly_availabilities: Vec::new(),
        }
    }

    fn dispatch(capacity: f64, cooling: bool) -> Dispatch {
        Dispatch {
            id: 1,
            date: None,
            time: None,
            requirements: Some(DispatchRequirements {
                capacity,
                cooling,
                heating: false,
                max_cost: None,
            }),
        }
    }

    fn plan_with(id: &str, score: f64, buffer: u32) -> MaintenancePlan {
        MaintenancePlan {
            drone_id: id.to_string(),
            risk_score: score,
            risk_level: RiskLevel::from_score(score),
            hours_until_service: 20.0,
            mission_buffer: buffer,
            recommendation: String::new(),
            contributing_factors: Vec::new(),
        }
    }

    #[test]
    fn prefers_low_risk_drone_over_high_risk() {
        let drones = vec![drone("A", 30.0, true), drone("B", 30.0, true)];
        let snapshot = |id: &str| match id {
            "A" => Some(plan_with("A", 25.0, 10)),
            "B" => Some(plan_with("B", 75.0, 10)),
            _ => None,
        };

        let (chosen, plan) =
            select_drone(&[dispatch(12.0, true)], &drones, snapshot).expect("candidate");
        assert_eq!(chosen.id, "A");
        assert_eq!(plan.unwrap().risk_level, RiskLevel::Low);
    }

    #[test]
    fn falls_back_to_high_risk_when_no_other_candidate_fits() {
        let drones = vec![drone("A", 8.0, false), drone("B", 40.0, false)];
        let snapshot = |id: &str| match id {
            "A" => Some(plan_with("A", 20.0, 10)),
            "B" => Some(plan_with("B", 75.0, 2)),
            _ => None,
        };

        let (chosen, _) =
            select_drone(&[dispatch(25.0, false)], &drones, snapshot).expect("fallback candidate");
        assert_eq!(chosen.id, "B");
    }

    #[test]
    fn missing_requirements_fails_the_whole_batch() {
        let drones = vec![drone("A", 30.0, false)];
        let batch = vec![
            dispatch(5.0, false),
            Dispatch {
                id: 2,
                date: None,
                time: None,
                requirements: None,
            },
        ];
        assert!(select_drone(&batch, &drones, |_| None).is_none());
    }

    #[test]
    fn aggregates_capacity_and_temperature_flags() {
        // Two dispatches sum to 26; only B can carry both, and the batch
        // needs cooling because one dispatch does.
        let drones = vec![drone("A", 25.0, true), drone("B", 30.0, true)];
        let batch = vec![dispatch(13.0, false), dispatch(13.0, true)];

        let (chosen, _) = select_drone(&batch, &drones, |_| None).expect("candidate");
        assert_eq!(chosen.id, "B");
    }

    #[test]
    fn drones_without_snapshot_score_a_neutral_fifty() {
        // A: no plan -> 50 + 0 + 3. B: healthy plan -> 80 + 20 + 3.
        let drones = vec![drone("A", 30.0, false), drone("B", 30.0, false)];
        let snapshot = |id: &str| (id == "B").then(|| plan_with("B", 20.0, 10));

        let (chosen, _) = select_drone(&[dispatch(5.0, false)], &drones, snapshot).unwrap();
        assert_eq!(chosen.id, "B");
    }

    #[test]
    fn no_capable_drone_yields_none() {
        let drones = vec![drone("A", 8.0, false)];
        assert!(select_drone(&[dispatch(25.0, false)], &drones, |_| None).is_none());

        // Cooling demanded but nobody has it, even in the fallback pass.
        let drones = vec![drone("A", 40.0, false)];
        assert!(select_drone(&[dispatch(5.0, true)], &drones, |_| None).is_none());
    }

    #[test]
    fn ties_keep_first_encountered_candidate() {
        let drones = vec![drone("A", 30.0, false), drone("B", 30.0, false)];
        let (chosen, _) = select_drone(&[dispatch(5.0, false)], &drones, |_| None).unwrap();
        assert_eq!(chosen.id, "A");
    }
}
