//! Ramer–Douglas–Peucker polyline simplification

use trellis_core::Point;

/// Default tolerance in canvas units.
pub const DEFAULT_TOLERANCE: f64 = 8.0;

/// Drop points that lie within `tolerance` of the chord between the points kept
/// around them. The first and last points are always kept; inputs of two points
/// or fewer come back unchanged.
///
/// Distances are measured to the chord as a segment, not as an infinite line, so
/// a point lying beyond either end of the chord is judged by its distance to
/// that end.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let tolerance = if tolerance.is_nan() { 0.0 } else { tolerance.max(0.0) };
    let sq_tolerance = tolerance * tolerance;
    let last = points.len() - 1;

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut ranges = vec![(0, last)];
    while let Some((first, last)) = ranges.pop() {
        let mut max_sq = sq_tolerance;
        let mut split = None;
        for i in first + 1..last {
            let d = segment_distance_squared(points[i], points[first], points[last]);
            if d > max_sq {
                max_sq = d;
                split = Some(i);
            }
        }
        if let Some(i) = split {
            keep[i] = true;
            ranges.push((first, i));
            ranges.push((i, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Squared distance from `p` to the segment `a`–`b`. Falls back to plain point
/// distance when `a == b`.
fn segment_distance_squared(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut closest = a;

    if dx != 0.0 || dy != 0.0 {
        let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            closest = b;
        } else if t > 0.0 {
            closest = Point::new(a.x + dx * t, a.y + dy * t);
        }
    }

    p.distance_squared(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_collapses_near_collinear_points() {
        let input = pts(&[(0.0, 0.0), (1.0, 0.01), (2.0, -0.01), (3.0, 0.0)]);
        assert_eq!(simplify(&input, 1.0), pts(&[(0.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_short_inputs_pass_through() {
        assert!(simplify(&[], 8.0).is_empty());
        let one = pts(&[(4.0, 4.0)]);
        assert_eq!(simplify(&one, 8.0), one);
        let two = pts(&[(0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(simplify(&two, 8.0), two);
    }

    #[test]
    fn test_keeps_real_corners() {
        let input = pts(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (100.0, 50.0), (100.0, 100.0)]);
        assert_eq!(
            simplify(&input, DEFAULT_TOLERANCE),
            pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)])
        );
    }

    #[test]
    fn test_closed_loop_uses_full_distance() {
        // chord endpoints coincide; the far point differs only in x
        let input = pts(&[(0.0, 0.0), (20.0, 0.0), (0.0, 0.0)]);
        assert_eq!(simplify(&input, 5.0), input);
    }

    #[test]
    fn test_idempotent_and_keeps_endpoints() {
        let input = pts(&[
            (0.0, 0.0),
            (10.0, 3.0),
            (20.0, -2.0),
            (30.0, 25.0),
            (40.0, 24.0),
            (50.0, 1.0),
            (60.0, 0.5),
            (70.0, 40.0),
            (80.0, 41.0),
        ]);
        for tolerance in [0.5, 4.0, 8.0, 30.0] {
            let once = simplify(&input, tolerance);
            assert_eq!(once.first(), input.first());
            assert_eq!(once.last(), input.last());
            assert_eq!(simplify(&once, tolerance), once, "tolerance {tolerance}");
        }
    }

    #[test]
    fn test_points_past_the_chord_end_use_endpoint_distance() {
        // (20, 1) is 1 unit off the line through the chord but ~10 from its end
        let input = pts(&[(0.0, 0.0), (20.0, 1.0), (10.0, 0.0)]);
        assert_eq!(simplify(&input, DEFAULT_TOLERANCE), input);
        assert_eq!(simplify(&input, 11.0), pts(&[(0.0, 0.0), (10.0, 0.0)]));
    }

    #[test]
    fn test_nan_tolerance_keeps_everything() {
        let input = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert_eq!(simplify(&input, f64::NAN), input);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn polyline_strategy() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 0..48)
            .prop_map(|raw| raw.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    proptest! {
        #[test]
        fn simplify_is_idempotent(points in polyline_strategy(), tolerance in 0.0f64..60.0) {
            let once = simplify(&points, tolerance);
            prop_assert_eq!(simplify(&once, tolerance), once);
        }

        #[test]
        fn simplify_keeps_endpoints(points in polyline_strategy(), tolerance in 0.0f64..60.0) {
            let out = simplify(&points, tolerance);
            prop_assert_eq!(out.first(), points.first());
            prop_assert_eq!(out.last(), points.last());
            prop_assert!(out.len() <= points.len());
        }
    }
}
