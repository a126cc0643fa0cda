use super::{Point2, INTERSECTION_EPSILON, TOLERANCE};

/// Parameter limits applied to one of the two lines of an intersection test.
///
/// A line runs from its first point (`t = 0`) to its second point (`t = 1`).
/// `low` rejects intersections before the first point, `high` rejects
/// intersections beyond the second point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineLimits {
    pub low: bool,
    pub high: bool,
}

impl LineLimits {
    /// Infinite line.
    pub const NONE: Self = Self {
        low: false,
        high: false,
    };

    /// Ray starting at the first point.
    pub const RAY: Self = Self {
        low: true,
        high: false,
    };

    /// Bounded segment.
    pub const SEGMENT: Self = Self {
        low: true,
        high: true,
    };

    fn rejects(self, t: f64) -> bool {
        (self.low && t < 0.0) || (self.high && t > 1.0)
    }
}

/// Intersection of the line through `a0, a1` with the line through `b0, b1`.
///
/// Returns `None` when either line has zero length, when the lines are
/// parallel within `epsilon` (the sine of the angle between them), or when
/// the intersection violates the limits of either line. Parameters within
/// `epsilon` of 0 or 1 snap onto the corresponding endpoint, which is then
/// returned exactly.
#[must_use]
pub fn intersection_of_lines_eps(
    a0: &Point2,
    a1: &Point2,
    limits_a: LineLimits,
    b0: &Point2,
    b1: &Point2,
    limits_b: LineLimits,
    epsilon: f64,
) -> Option<Point2> {
    let da = a1 - a0;
    let db = b1 - b0;
    let len_a = da.norm();
    let len_b = db.norm();
    if len_a < TOLERANCE || len_b < TOLERANCE {
        return None;
    }

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() <= epsilon * len_a * len_b {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let t = snap((dx * db.y - dy * db.x) / cross, epsilon);
    let u = snap((dx * da.y - dy * da.x) / cross, epsilon);

    if limits_a.rejects(t) || limits_b.rejects(u) {
        return None;
    }

    // Exact endpoints avoid drift when lines share a vertex.
    #[allow(clippy::float_cmp)]
    let pt = if t == 0.0 {
        *a0
    } else if t == 1.0 {
        *a1
    } else if u == 0.0 {
        *b0
    } else if u == 1.0 {
        *b1
    } else {
        a0 + da * t
    };
    Some(pt)
}

/// Intersection of two infinite lines, `None` when (nearly) parallel.
#[must_use]
pub fn intersection_of_lines(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    intersection_of_lines_eps(
        a0,
        a1,
        LineLimits::NONE,
        b0,
        b1,
        LineLimits::NONE,
        INTERSECTION_EPSILON,
    )
}

/// Bounded segment-segment intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Point2> {
    intersection_of_lines_eps(
        a0,
        a1,
        LineLimits::SEGMENT,
        b0,
        b1,
        LineLimits::SEGMENT,
        INTERSECTION_EPSILON,
    )
}

fn snap(t: f64, epsilon: f64) -> f64 {
    if t.abs() <= epsilon {
        0.0
    } else if (t - 1.0).abs() <= epsilon {
        1.0
    } else {
        t
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perpendicular_lines() {
        let p = intersection_of_lines(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.5, -1.0),
            &Point2::new(0.5, 1.0),
        )
        .unwrap();
        assert_abs_diff_eq!(p.x, 0.5, epsilon = TOLERANCE);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn parallel_returns_none() {
        let p = intersection_of_lines(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        );
        assert!(p.is_none());
    }

    #[test]
    fn near_parallel_returns_none() {
        let p = intersection_of_lines_eps(
            &Point2::new(0.0, 0.0),
            &Point2::new(1000.0, 0.0),
            LineLimits::NONE,
            &Point2::new(0.0, 1.0),
            &Point2::new(1000.0, 1.0 + 1e-9),
            LineLimits::NONE,
            1e-9,
        );
        assert!(p.is_none());
    }

    #[test]
    fn zero_length_line_returns_none() {
        let a = Point2::new(1.0, 1.0);
        let p = intersection_of_lines(&a, &a, &Point2::new(0.0, 0.0), &Point2::new(2.0, 2.0));
        assert!(p.is_none());
    }

    #[test]
    fn segment_crossing() {
        let p = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(p.x, 1.0, epsilon = TOLERANCE);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn segment_limits_reject_extension() {
        let a0 = Point2::new(0.0, 0.0);
        let a1 = Point2::new(1.0, 0.0);
        let b0 = Point2::new(2.0, -1.0);
        let b1 = Point2::new(2.0, 1.0);
        assert!(segment_segment_intersect_2d(&a0, &a1, &b0, &b1).is_none());
        // The ray through a0 -> a1 does reach x = 2.
        let p = intersection_of_lines_eps(
            &a0,
            &a1,
            LineLimits::RAY,
            &b0,
            &b1,
            LineLimits::SEGMENT,
            INTERSECTION_EPSILON,
        )
        .unwrap();
        assert_abs_diff_eq!(p.x, 2.0, epsilon = TOLERANCE);
        // But not backwards.
        let q = intersection_of_lines_eps(
            &a1,
            &a0,
            LineLimits::RAY,
            &b0,
            &b1,
            LineLimits::NONE,
            INTERSECTION_EPSILON,
        );
        assert!(q.is_none());
    }

    #[test]
    fn shared_endpoint_is_exact() {
        let a0 = Point2::new(0.1, 0.2);
        let shared = Point2::new(0.7, 0.3);
        let b1 = Point2::new(1.3, -0.9);
        let p = intersection_of_lines_eps(
            &a0,
            &shared,
            LineLimits::SEGMENT,
            &shared,
            &b1,
            LineLimits::SEGMENT,
            1e-9,
        )
        .unwrap();
        assert_eq!(p, shared);
    }
}
