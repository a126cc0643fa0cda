//! Fractional projection onto a curve and projected vertex curvature.
//!
//! The plane is partitioned per segment rather than per point: each segment
//! owns the wedge between the angle bisectors at its two vertices. A point is
//! projected onto a segment along the line through the segment's helper
//! center (the intersection of both bisectors), or along the helper
//! direction when the bisectors are parallel. This avoids the jumps of a
//! plain closest-point projection at bends.

use tracing::trace;

use crate::error::{GeometryError, Result};
use crate::math::distance_2d::{closest_point_on_segment, point_to_segment_dist};
use crate::math::intersect_2d::intersection_of_lines;
use crate::math::polygon_2d::left_normal;
use crate::math::{ensure_finite, Point2, Vector2, FRACTION_PRECISION};

use super::Curve;

/// What [`Curve::project_fractional`] returns when no segment accepts the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionalFallback {
    /// Fraction of the closest point on the whole curve.
    Orthogonal,
    /// Extrapolated fraction from the closest end point: negative before the
    /// start, above one beyond the end.
    Endpoint,
    /// `NaN`.
    NaN,
}

impl FractionalFallback {
    fn fraction(self, curve: &Curve, point: &Point2) -> f64 {
        match self {
            Self::Orthogonal => curve.closest_on_curve(point).0,
            Self::Endpoint => {
                let length = curve.length();
                let d_start = (point - curve.first()).norm();
                let d_end = (point - curve.last()).norm();
                if d_start < d_end {
                    -d_start / length
                } else {
                    (length + d_end) / length
                }
            }
            Self::NaN => f64::NAN,
        }
    }
}

/// How a segment projects points onto itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Helper {
    Center(Point2),
    Direction(Vector2),
}

/// End-direction independent projection geometry, cached per curve.
#[derive(Debug, Clone)]
pub(crate) struct ProjectionHelpers {
    /// Point one unit along the angle bisector at each vertex. First and last
    /// entries are placeholders; those depend on the requested end directions.
    bisectors: Vec<Point2>,
    /// Helper per segment; `None` for the first and last segment.
    segments: Vec<Option<Helper>>,
}

impl ProjectionHelpers {
    fn build(curve: &Curve) -> Self {
        let pts = curve.points();
        let n = pts.len();
        let dirs = curve.segment_directions();

        let mut bisectors = pts.to_vec();
        for i in 1..n.saturating_sub(1) {
            let prev_n = left_normal(dirs[i - 1]);
            let next_n = left_normal(dirs[i]);
            let prev = (pts[i - 1] + prev_n, pts[i] + prev_n);
            let next = (pts[i] + next_n, pts[i + 1] + next_n);
            let midpoint = Point2::from((prev.1.coords + next.0.coords) * 0.5);
            let gap = (prev.1 - next.0).norm();
            bisectors[i] = match intersection_of_lines(&prev.0, &prev.1, &next.0, &next.1) {
                Some(p) if gap >= (prev.1 - p).norm().min((next.0 - p).norm()) => p,
                _ => midpoint,
            };
        }

        let segments = (0..n.saturating_sub(1))
            .map(|i| {
                if i == 0 || i + 2 == n {
                    None
                } else {
                    Some(segment_helper(
                        &pts[i],
                        &bisectors[i],
                        &pts[i + 1],
                        &bisectors[i + 1],
                        false,
                    ))
                }
            })
            .collect();

        Self {
            bisectors,
            segments,
        }
    }
}

/// Helper of the segment `a -> b` given bisector points at both vertices.
/// Parallel bisectors yield a direction taken from the start vertex, or from
/// the end vertex when `use_end` is set.
fn segment_helper(a: &Point2, bisector_a: &Point2, b: &Point2, bisector_b: &Point2, use_end: bool) -> Helper {
    match intersection_of_lines(a, bisector_a, b, bisector_b) {
        Some(center) => Helper::Center(center),
        None if use_end => Helper::Direction(bisector_b - b),
        None => Helper::Direction(bisector_a - a),
    }
}

/// Point one unit to the left of `vertex` for a travel direction `angle`.
fn unit_left_of(vertex: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    vertex + left_normal(Vector2::new(cos, sin))
}

/// Whether the helper center lies between `point` and its candidate projection.
fn center_between(center: &Point2, point: &Point2, candidate: &Point2) -> bool {
    let eps = FRACTION_PRECISION;
    (point.x < center.x + eps && center.x + eps < candidate.x)
        || (point.x > center.x - eps && center.x - eps > candidate.x)
        || (point.y < center.y + eps && center.y + eps < candidate.y)
        || (point.y > center.y - eps && center.y - eps > candidate.y)
}

impl Curve {
    fn projection_helpers(&self) -> &ProjectionHelpers {
        self.helpers.get_or_init(|| ProjectionHelpers::build(self))
    }

    /// Helpers for all segments given the directions at both ends; `None`
    /// uses the first or last segment's own direction.
    fn segment_helpers(&self, start_direction: Option<f64>, end_direction: Option<f64>) -> Vec<Helper> {
        let pts = self.points();
        let n = pts.len();
        let dirs = self.segment_directions();
        let cached = self.projection_helpers();

        let start_angle = start_direction.unwrap_or_else(|| dirs[0].y.atan2(dirs[0].x));
        let last_dir = dirs[n - 2];
        let end_angle = end_direction.unwrap_or_else(|| last_dir.y.atan2(last_dir.x));
        let start_bisector = unit_left_of(&pts[0], start_angle);
        let end_bisector = unit_left_of(&pts[n - 1], end_angle);

        if n == 2 {
            return vec![segment_helper(&pts[0], &start_bisector, &pts[1], &end_bisector, false)];
        }

        let mut helpers: Vec<Helper> = Vec::with_capacity(n - 1);
        helpers.push(segment_helper(
            &pts[0],
            &start_bisector,
            &pts[1],
            &cached.bisectors[1],
            false,
        ));
        helpers.extend(cached.segments[1..n - 2].iter().flatten().copied());
        helpers.push(segment_helper(
            &pts[n - 2],
            &cached.bisectors[n - 2],
            &pts[n - 1],
            &end_bisector,
            true,
        ));
        helpers
    }

    /// Fraction along the curve whose segment zone contains `(x, y)`.
    ///
    /// `start_direction` and `end_direction` (radians) replace the direction
    /// of the first and last segment where the zones at the curve ends are
    /// constructed. When no segment accepts the point, `fallback` decides.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for non-finite input and
    /// `GeometryError::Degenerate` for a curve without length.
    pub fn project_fractional(
        &self,
        start_direction: Option<f64>,
        end_direction: Option<f64>,
        x: f64,
        y: f64,
        fallback: FractionalFallback,
    ) -> Result<f64> {
        ensure_finite("x", x)?;
        ensure_finite("y", y)?;
        if let Some(d) = start_direction {
            ensure_finite("start direction", d)?;
        }
        if let Some(d) = end_direction {
            ensure_finite("end direction", d)?;
        }
        self.ensure_has_length("fractional projection")?;

        let point = Point2::new(x, y);
        let pts = self.points();
        let lengths = self.lengths();
        let helpers = self.segment_helpers(start_direction, end_direction);

        let distances: Vec<f64> = pts
            .windows(2)
            .map(|w| point_to_segment_dist(&point, &w[0], &w[1]))
            .collect();
        let min_distance = distances.iter().copied().fold(f64::INFINITY, f64::min);

        let mut best: Option<(usize, f64, f64)> = None;
        for (i, helper) in helpers.iter().enumerate() {
            // Often two segments are equally close at their shared vertex.
            if distances[i] > min_distance + FRACTION_PRECISION {
                continue;
            }
            let (a, b) = (&pts[i], &pts[i + 1]);
            let candidate = match helper {
                Helper::Center(center) => {
                    match intersection_of_lines(center, &point, a, b) {
                        Some(p) if !center_between(center, &point, &p) => Some(p),
                        _ => None,
                    }
                }
                Helper::Direction(dir) => intersection_of_lines(&point, &(point + dir), a, b),
            };
            let Some(p) = candidate else {
                continue;
            };
            let seg_len = (b - a).norm() + FRACTION_PRECISION;
            if (p - a).norm() > seg_len || (p - b).norm() > seg_len {
                continue;
            }
            let distance = (point - p).norm();
            if best.is_none_or(|(_, _, d)| distance < d) {
                best = Some((i, (p - a).norm(), distance));
            }
        }

        match best {
            Some((i, along, _)) => Ok((lengths[i] + along) / self.length()),
            None => {
                trace!(x, y, ?fallback, "no segment accepts point, using fallback");
                Ok(fallback.fraction(self, &point))
            }
        }
    }

    /// Closest point on the curve and its fraction of the arc length.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for non-finite input and
    /// `GeometryError::Degenerate` for a curve without length.
    pub fn project_orthogonal(&self, point: &Point2) -> Result<(f64, Point2)> {
        ensure_finite("x", point.x)?;
        ensure_finite("y", point.y)?;
        self.ensure_has_length("orthogonal projection")?;
        Ok(self.closest_on_curve(point))
    }

    /// Closest point on the curve.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::project_orthogonal`].
    pub fn closest_point(&self, point: &Point2) -> Result<Point2> {
        self.project_orthogonal(point).map(|(_, p)| p)
    }

    fn closest_on_curve(&self, point: &Point2) -> (f64, Point2) {
        let lengths = self.lengths();
        let mut best = (0.0, self.first(), f64::INFINITY);
        for (i, w) in self.points().windows(2).enumerate() {
            let (c, t) = closest_point_on_segment(point, &w[0], &w[1]);
            let d = (point - c).norm();
            if d < best.2 {
                let position = lengths[i] + t * (lengths[i + 1] - lengths[i]);
                best = (position, c, d);
            }
        }
        (best.0 / self.length(), best.1)
    }

    /// Signed radius of the circle tangent to both edges at vertex `index`,
    /// centered on the perpendicular bisector of the shorter edge. Positive
    /// for a left bend, negative for a right bend, `NaN` when the edges are
    /// collinear.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless
    /// `1 <= index <= len - 2`.
    #[allow(clippy::cast_precision_loss)]
    pub fn projected_vertex_radius(&self, index: usize) -> Result<f64> {
        let n = self.len();
        if index < 1 || index + 2 > n {
            return Err(GeometryError::out_of_range(
                "vertex index",
                index as f64,
                1.0,
                n as f64 - 2.0,
            )
            .into());
        }
        Ok(*self.vertex_radii[index].get_or_init(|| self.compute_vertex_radius(index)))
    }

    fn compute_vertex_radius(&self, index: usize) -> f64 {
        let pts = self.points();
        let lengths = self.lengths();
        let length1 = lengths[index] - lengths[index - 1];
        let length2 = lengths[index + 1] - lengths[index];
        let short = if length1 < length2 { index } else { index + 1 };

        let (a, b) = (&pts[short - 1], &pts[short]);
        let p1 = Point2::from((a.coords + b.coords) * 0.5);
        // Placed to the right of the shorter edge.
        let p2 = Point2::new(p1.x + (b.y - a.y), p1.y - (b.x - a.x));
        let p3 = &pts[index];
        let p4 = &self.projection_helpers().bisectors[index];

        let Some(intersection) = intersection_of_lines(&p1, &p2, p3, p4) else {
            return f64::NAN;
        };
        let reference = length1.min(length2);
        let radius = (intersection - p1).norm();
        let to_p2 = (intersection - p2).norm();
        if radius < to_p2 && to_p2 > reference {
            radius
        } else {
            -radius
        }
    }

    /// Governing curvature radius at `fraction`: the smaller-magnitude radius
    /// of the two vertices bracketing the segment there. The first and last
    /// segment use their single interior vertex; a two-point curve has none
    /// and returns `NaN`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` outside `[0, 1]`.
    pub fn projected_radius(&self, fraction: f64) -> Result<f64> {
        ensure_finite("fraction", fraction)?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(GeometryError::out_of_range("fraction", fraction, 0.0, 1.0).into());
        }
        let n = self.len();
        if n < 3 {
            return Ok(f64::NAN);
        }
        let index = self.segment_at(fraction * self.length());
        if index == 0 {
            return self.projected_vertex_radius(1);
        }
        if index == n - 2 {
            return self.projected_vertex_radius(n - 2);
        }
        let r1 = self.projected_vertex_radius(index)?;
        let r2 = self.projected_vertex_radius(index + 1)?;
        Ok(if r1.abs() < r2.abs() { r1 } else { r2 })
    }
}
