//! Joint angle calculation using dot product
//!
//! The angle is measured at the middle point (vertex) between the
//! vectors vertex→a and vertex→c.

use super::point::Point;

/// Vectors shorter than this cannot define an angle
const MIN_VECTOR_LENGTH: f64 = 1e-4;

/// Angle at `vertex` in degrees, in [0, 180]
///
/// Uses cos(θ) = (v1 · v2) / (|v1| × |v2|), clamped to [-1, 1] so
/// floating-point overshoot never produces NaN.
/// Returns `None` when either arm is degenerate (points coincide).
pub fn angle_at(a: Point, vertex: Point, c: Point) -> Option<f64> {
    let v1 = a.to_vector() - vertex.to_vector();
    let v2 = c.to_vector() - vertex.to_vector();

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 < MIN_VECTOR_LENGTH || mag2 < MIN_VECTOR_LENGTH {
        return None;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Start/end radians for drawing the arc of the angle at `vertex`,
/// ordered so the sweep from start to end is the interior angle.
pub fn arc_span(a: Point, vertex: Point, c: Point) -> (f64, f64) {
    let start = (a.y - vertex.y).atan2(a.x - vertex.x);
    let end = (c.y - vertex.y).atan2(c.x - vertex.x);

    let mut sweep = end - start;
    while sweep <= -std::f64::consts::PI {
        sweep += std::f64::consts::TAU;
    }
    while sweep > std::f64::consts::PI {
        sweep -= std::f64::consts::TAU;
    }

    if sweep >= 0.0 {
        (start, start + sweep)
    } else {
        (end, end - sweep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colinear_is_straight() {
        let angle = angle_at(Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(1.0, 0.0));
        assert!((angle.unwrap() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let vertex = Point::new(2.0, 3.0);
        let a = Point::new(3.0, 3.0);
        let c = Point::new(2.0, 4.0);
        let angle = angle_at(a, vertex, c).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_arm() {
        let p = Point::new(1.0, 1.0);
        assert_eq!(angle_at(p, p, Point::new(2.0, 2.0)), None);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        // Nearly identical directions can push cos above 1.0
        let angle = angle_at(
            Point::new(1e6, 1e-9),
            Point::new(0.0, 0.0),
            Point::new(1e6, 0.0),
        )
        .unwrap();
        assert!(angle.is_finite());
        assert!(angle < 1e-6);
    }

    #[test]
    fn test_arc_span_is_interior() {
        let (start, end) = arc_span(
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
        );
        assert!((end - start - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        // Reversed order yields the same sweep
        let (start, end) = arc_span(
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        );
        assert!((end - start - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
