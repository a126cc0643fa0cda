use super::distance_2d::closest_point_on_segment;
use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a closed ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// Returns `None` if the segment has zero length.
#[must_use]
pub fn segment_direction(a: &Point2, b: &Point2) -> Option<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Even-odd point-in-ring test. Points on the boundary may go either way;
/// callers that need a strict interior test check the boundary first.
#[must_use]
pub fn point_in_ring(p: &Point2, ring: &[Point2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&ring[i], &ring[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pi.x + (p.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns the closest point on the boundary of a closed ring and its distance.
///
/// A single-point ring returns that point.
#[must_use]
pub fn closest_point_on_ring(p: &Point2, ring: &[Point2]) -> Option<(Point2, f64)> {
    let n = ring.len();
    let mut best: Option<(Point2, f64)> = None;
    for i in 0..n {
        let (c, _) = closest_point_on_segment(p, &ring[i], &ring[(i + 1) % n]);
        let d = (p - c).norm();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((c, d));
        }
    }
    best
}

/// Whether any edge of ring `a` crosses or touches any edge of ring `b`.
#[must_use]
pub fn ring_edges_cross(a: &[Point2], b: &[Point2]) -> bool {
    let (na, nb) = (a.len(), b.len());
    (0..na).any(|i| {
        let (a0, a1) = (&a[i], &a[(i + 1) % na]);
        (0..nb).any(|j| segment_segment_intersect_2d(a0, a1, &b[j], &b[(j + 1) % nb]).is_some())
    })
}
