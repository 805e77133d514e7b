//! Small planar geometry helpers backing the utility endpoints.
//!
//! All math is done directly in degrees; at the scale of the stepped paths
//! (fractions of a millidegree) a planar approximation is sufficient.

use crate::models::Position;

/// Two positions closer than this are considered the same place.
pub const CLOSE_DISTANCE_DEG: f64 = 0.00015;

/// Step taken by [`next_position`], in degrees.
pub const MOVE_STEP_DEG: f64 = 0.0001;

/// Planar distance between two positions, in degrees.
pub fn distance(a: Position, b: Position) -> f64 {
    let dx = a.lng - b.lng;
    let dy = a.lat - b.lat;
    (dx * dx + dy * dy).sqrt()
}

/// Whether two positions are within [`CLOSE_DISTANCE_DEG`] of each other.
pub fn is_close(a: Position, b: Position) -> bool {
    distance(a, b) < CLOSE_DISTANCE_DEG
}

/// Position one step from `start` along `angle_deg` (0 = east, 90 = north).
pub fn next_position(start: Position, angle_deg: f64) -> Position {
    let rad = angle_deg.to_radians();
    Position::new(
        start.lng + MOVE_STEP_DEG * rad.cos(),
        start.lat + MOVE_STEP_DEG * rad.sin(),
    )
}

/// Ray-casting point-in-polygon test over the region's vertices.
pub fn is_in_region(position: Position, vertices: &[Position]) -> bool {
    let x = position.lng;
    let y = position.lat;
    let mut inside = false;

    let n = vertices.len();
    let mut j = n.saturating_sub(1);
    for i in 0..n {
        let (xi, yi) = (vertices[i].lng, vertices[i].lat);
        let (xj, yj) = (vertices[j].lng, vertices[j].lat);

        // 1e-12 guards the division when an edge is horizontal.
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi + 1e-12) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_planar_euclidean() {
        let d = distance(Position::new(0.0, 0.0), Position::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn close_threshold_is_strict() {
        let a = Position::new(0.0, 0.0);
        assert!(is_close(a, Position::new(0.0001, 0.0)));
        assert!(!is_close(a, Position::new(0.00015, 0.0)));
    }

    #[test]
    fn next_position_moves_one_step_east_at_zero_degrees() {
        let next = next_position(Position::new(1.0, 2.0), 0.0);
        assert!((next.lng - 1.0001).abs() < 1e-12);
        assert!((next.lat - 2.0).abs() < 1e-12);
    }

    #[test]
    fn square_region_contains_its_center_but_not_outside_points() {
        let square = vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(0.0, 1.0),
        ];
        assert!(is_in_region(Position::new(0.5, 0.5), &square));
        assert!(!is_in_region(Position::new(1.5, 0.5), &square));
        assert!(!is_in_region(Position::new(0.5, -0.1), &square));
    }

    #[test]
    fn empty_region_contains_nothing() {
        assert!(!is_in_region(Position::new(0.0, 0.0), &[]));
    }
}
