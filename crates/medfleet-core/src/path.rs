//! Delivery path planning and cost allocation.
//!
//! Given a dispatch batch, picks a drone (see [`crate::selection`]), builds a
//! stepped waypoint path visiting one synthetic delivery point per dispatch,
//! and allocates the flight cost across dispatches proportionally to the
//! moves each one consumes. Budget validation is all-or-nothing: a single
//! dispatch over its ceiling rejects the whole batch.

use serde::Serialize;

use crate::models::{DeliveryFlight, DeliveryPath, Dispatch, Drone, DronePath, MaintenancePlan, Position};
use crate::selection::select_drone;

/// Fixed service point (depot) every delivery loop starts and ends at.
pub const SERVICE_POINT: Position = Position {
    lng: -3.186874,
    lat: 55.944494,
};

/// Per-dispatch offset used to synthesize delivery waypoints, in degrees.
/// Stands in for geocoded delivery addresses.
const DELIVERY_OFFSET_DEG: f64 = 0.0003;

/// Step length of the stepped flight path, in degrees.
const PATH_STEP_DEG: f64 = 0.00015;

/// Numerical slack applied when comparing a cost share to its ceiling.
const COST_TOLERANCE: f64 = 1e-9;

/// Plan the delivery path for a dispatch batch.
///
/// Returns the zero sentinel ([`DeliveryPath::empty`]) whenever the batch is
/// empty, malformed, no drone qualifies, or a cost ceiling is exceeded.
pub fn plan_delivery<F>(dispatches: &[Dispatch], drones: &[Drone], snapshot: F) -> DeliveryPath
where
    F: Fn(&str) -> Option<MaintenancePlan>,
{
    if dispatches.is_empty() || drones.is_empty() {
        return DeliveryPath::empty();
    }

    let Some((chosen, plan)) = select_drone(dispatches, drones, snapshot) else {
        return DeliveryPath::empty();
    };
    let Some(cap) = chosen.capability.as_ref() else {
        return DeliveryPath::empty();
    };

    let waypoints: Vec<Position> = (0..dispatches.len())
        .map(|i| {
            let offset = DELIVERY_OFFSET_DEG * (i + 1) as f64;
            Position::new(SERVICE_POINT.lng + offset, SERVICE_POINT.lat + offset)
        })
        .collect();

    let mut deliveries: Vec<DeliveryFlight> = Vec::with_capacity(dispatches.len());
    let mut moves_per_delivery: Vec<u32> = Vec::with_capacity(dispatches.len());
    let mut total_moves: u32 = 0;

    for (i, dispatch) in dispatches.iter().enumerate() {
        let start = if i == 0 { SERVICE_POINT } else { waypoints[i - 1] };
        let target = waypoints[i];

        let mut segment = build_leg(start, target);

        // Observed quirk preserved on purpose: the target coordinate is
        // appended once via the mismatch check and once more unconditionally,
        // so every segment ends with a duplicate vertex.
        let ends_on_target = segment
            .last()
            .is_some_and(|last| last.lng == target.lng && last.lat == target.lat);
        if !ends_on_target {
            segment.push(target);
        }
        segment.push(target);

        if i == dispatches.len() - 1 {
            let mut back = build_leg(target, SERVICE_POINT);
            if !back.is_empty() {
                // Drop the leading vertex so the join is not repeated.
                back.remove(0);
                segment.extend(back);
            }
        }

        let moves = (segment.len() - 1) as u32;
        total_moves += moves;
        moves_per_delivery.push(moves);
        deliveries.push(DeliveryFlight {
            delivery_id: dispatch.id,
            flight_path: segment,
        });
    }

    if total_moves == 0 {
        return DeliveryPath::empty();
    }

    let base_cost = cap.cost_initial + cap.cost_final + cap.cost_per_move * f64::from(total_moves);

    for (dispatch, moves) in dispatches.iter().zip(&moves_per_delivery) {
        let Some(max_cost) = dispatch.max_cost() else {
            continue;
        };
        let share = base_cost * (f64::from(*moves) / f64::from(total_moves));
        if share - max_cost > COST_TOLERANCE {
            return DeliveryPath::empty();
        }
    }

    DeliveryPath {
        total_cost: base_cost,
        total_moves,
        drone_paths: vec![DronePath {
            drone_id: chosen.id.clone(),
            deliveries,
        }],
        maintenance_plan: plan,
    }
}

/// Render the planned path as a GeoJSON LineString feature.
///
/// Only the first dispatch's segment is rendered; an empty or infeasible
/// result becomes a feature with an empty coordinate list.
pub fn delivery_path_geojson<F>(dispatches: &[Dispatch], drones: &[Drone], snapshot: F) -> String
where
    F: Fn(&str) -> Option<MaintenancePlan>,
{
    let result = plan_delivery(dispatches, drones, snapshot);
    let coordinates = result
        .drone_paths
        .first()
        .and_then(|path| path.deliveries.first())
        .map(|flight| {
            flight
                .flight_path
                .iter()
                .map(|p| [p.lng, p.lat])
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    line_feature(coordinates)
}

#[derive(Serialize)]
struct LineFeature {
    r#type: &'static str,
    geometry: LineGeometry,
    properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct LineGeometry {
    r#type: &'static str,
    coordinates: Vec<[f64; 2]>,
}

fn line_feature(coordinates: Vec<[f64; 2]>) -> String {
    let feature = LineFeature {
        r#type: "Feature",
        geometry: LineGeometry {
            r#type: "LineString",
            coordinates,
        },
        properties: serde_json::Map::new(),
    };
    serde_json::to_string(&feature).expect("line feature serializes")
}

/// Build a straight stepped leg from `from` to `to`.
///
/// Step count is ceil(distance / step); a zero-distance leg collapses to a
/// single point. Distance is planar in degrees, consistent with the rest of
/// the synthetic geometry.
fn build_leg(from: Position, to: Position) -> Vec<Position> {
    let dx = to.lng - from.lng;
    let dy = to.lat - from.lat;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return vec![from];
    }

    let steps = (distance / PATH_STEP_DEG).ceil() as usize;
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Position::new(from.lng + dx * t, from.lat + dy * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DispatchRequirements, DroneCapability};

    fn fleet_drone(id: &str, capacity: f64) -> Drone {
        Drone {
            id: id.to_string(),
            name: None,
            capability: Some(DroneCapability {
                capacity,
                cooling: true,
                heating: true,
                max_moves: 60.0,
                cost_initial: 10.0,
                cost_final: 10.0,
                cost_per_move: 1.0,
            }),
            weekly_availabilities: Vec::new(),
        }
    }

    fn dispatch(id: i64, capacity: f64, max_cost: Option<f64>) -> Dispatch {
        Dispatch {
            id,
            date: None,
            time: None,
            requirements: Some(DispatchRequirements {
                capacity,
                cooling: false,
                heating: false,
                max_cost,
            }),
        }
    }

    #[test]
    fn leg_steps_at_fixed_increment_and_lands_on_target() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(0.0003, 0.0003);
        let leg = build_leg(from, to);

        // distance = 0.0003 * sqrt(2) ~ 4.24e-4, step 1.5e-4 -> 3 steps.
        assert_eq!(leg.len(), 4);
        assert_eq!(leg[0], from);
        assert_eq!(*leg.last().unwrap(), to);
    }

    #[test]
    fn zero_distance_leg_is_a_single_point() {
        let p = Position::new(1.0, 2.0);
        assert_eq!(build_leg(p, p), vec![p]);
    }

    #[test]
    fn single_dispatch_cost_is_base_plus_per_move() {
        let drones = vec![fleet_drone("D1", 30.0)];
        let result = plan_delivery(&[dispatch(1, 5.0, None)], &drones, |_| None);

        assert!(result.total_moves > 0);
        assert_eq!(
            result.total_cost,
            20.0 + f64::from(result.total_moves) * 1.0
        );
        assert_eq!(result.drone_paths.len(), 1);
        assert_eq!(result.drone_paths[0].drone_id, "D1");
        assert_eq!(result.drone_paths[0].deliveries.len(), 1);
    }

    #[test]
    fn every_segment_ends_with_a_duplicated_target_vertex() {
        let drones = vec![fleet_drone("D1", 30.0)];
        let batch = vec![dispatch(1, 5.0, None), dispatch(2, 5.0, None)];
        let result = plan_delivery(&batch, &drones, |_| None);

        // First dispatch's segment ends exactly on its waypoint, twice.
        let first = &result.drone_paths[0].deliveries[0].flight_path;
        let expected = Position::new(
            SERVICE_POINT.lng + DELIVERY_OFFSET_DEG,
            SERVICE_POINT.lat + DELIVERY_OFFSET_DEG,
        );
        let n = first.len();
        assert!(n >= 3);
        assert_eq!(first[n - 1], expected);
        assert_eq!(first[n - 2], expected);

        // Last dispatch's segment carries the return leg home.
        let last = &result.drone_paths[0].deliveries[1].flight_path;
        assert_eq!(*last.last().unwrap(), SERVICE_POINT);
    }

    #[test]
    fn moves_match_segment_vertex_counts() {
        let drones = vec![fleet_drone("D1", 30.0)];
        let batch = vec![dispatch(1, 5.0, None), dispatch(2, 5.0, None)];
        let result = plan_delivery(&batch, &drones, |_| None);

        let counted: usize = result.drone_paths[0]
            .deliveries
            .iter()
            .map(|d| d.flight_path.len() - 1)
            .sum();
        assert_eq!(result.total_moves as usize, counted);
    }

    #[test]
    fn cost_ceiling_violation_rejects_the_whole_batch() {
        let drones = vec![fleet_drone("D1", 30.0)];
        let batch = vec![
            dispatch(1, 5.0, Some(0.001)),
            dispatch(2, 5.0, None),
        ];
        let result = plan_delivery(&batch, &drones, |_| None);

        assert_eq!(result.total_moves, 0);
        assert_eq!(result.total_cost, 0.0);
        assert!(result.drone_paths.is_empty());
        assert!(result.maintenance_plan.is_none());
    }

    #[test]
    fn generous_ceilings_do_not_reject() {
        let drones = vec![fleet_drone("D1", 30.0)];
        let batch = vec![
            dispatch(1, 5.0, Some(10_000.0)),
            dispatch(2, 5.0, Some(10_000.0)),
        ];
        let result = plan_delivery(&batch, &drones, |_| None);
        assert!(result.total_moves > 0);
    }

    #[test]
    fn empty_batch_or_empty_fleet_returns_sentinel() {
        let drones = vec![fleet_drone("D1", 30.0)];
        assert!(plan_delivery(&[], &drones, |_| None).is_empty());
        assert!(plan_delivery(&[dispatch(1, 5.0, None)], &[], |_| None).is_empty());
    }

    #[test]
    fn chosen_plan_rides_along_with_the_result() {
        use crate::models::RiskLevel;
        let drones = vec![fleet_drone("D1", 30.0)];
        let snapshot = |id: &str| {
            Some(MaintenancePlan {
                drone_id: id.to_string(),
                risk_score: 12.0,
                risk_level: RiskLevel::Low,
                hours_until_service: 40.0,
                mission_buffer: 15,
                recommendation: "ok".to_string(),
                contributing_factors: Vec::new(),
            })
        };
        let result = plan_delivery(&[dispatch(1, 5.0, None)], &drones, snapshot);
        assert_eq!(result.maintenance_plan.unwrap().drone_id, "D1");
    }

    #[test]
    fn geojson_of_empty_batch_is_an_empty_line() {
        let geojson = delivery_path_geojson(&[], &[], |_| None);
        assert_eq!(
            geojson,
            r#"{"type":"Feature","geometry":{"type":"LineString","coordinates":[]},"properties":{}}"#
        );
    }

    #[test]
    fn geojson_of_planned_batch_carries_first_segment() {
        let drones = vec![fleet_drone("D1", 30.0)];
        let geojson = delivery_path_geojson(&[dispatch(1, 5.0, None)], &drones, |_| None);
        assert!(geojson.starts_with(r#"{"type":"Feature","geometry":{"type":"LineString""#));
        assert!(geojson.contains("-3.186874"));
    }
}
