use tracing::trace;

use crate::error::Result;
use crate::geometry::curve::filter_close_points;
use crate::geometry::Curve;
use crate::math::intersect_2d::intersection_of_lines;
use crate::math::polygon_2d::left_normal;
use crate::math::{ensure_finite, Point2, Vector2, TOLERANCE};

use super::OffsetParams;

/// Offsets a curve by a constant distance.
///
/// # Sign Convention
///
/// - Positive distance: left offset (relative to walking direction)
/// - Negative distance: right offset
///
/// End vertices move along the normal of their segment. Interior vertices
/// move to the miter point where the two adjacent offset lines meet, so every
/// input vertex yields one output vertex before close points are collapsed.
#[derive(Debug)]
pub struct CurveOffset2D<'a> {
    curve: &'a Curve,
    distance: f64,
    params: OffsetParams,
}

impl<'a> CurveOffset2D<'a> {
    /// Creates a new constant offset operation with default parameters.
    #[must_use]
    pub fn new(curve: &'a Curve, distance: f64) -> Self {
        Self {
            curve,
            distance,
            params: OffsetParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: OffsetParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// - `GeometryError::NonFinite` for a non-finite distance
    /// - `GeometryError::Degenerate` for a curve without length
    pub fn execute(&self) -> Result<Curve> {
        let d = ensure_finite("offset", self.distance)?;
        if d == 0.0 {
            return Ok(self.curve.clone());
        }
        self.curve.ensure_has_length("offset")?;

        let raw = offset_vertices(self.curve, d, self.params.miter_limit);
        let points = filter_close_points(&raw, self.params.collapse_tolerance);
        if points.len() < raw.len() {
            trace!(
                offset = d,
                collapsed = raw.len() - points.len(),
                "collapsed close offset points"
            );
        }
        Curve::new(points)
    }
}

/// One offset point per vertex, before collapsing.
fn offset_vertices(curve: &Curve, distance: f64, miter_limit: f64) -> Vec<Point2> {
    let pts = curve.points();
    let n = pts.len();
    let normals: Vec<Vector2> = curve
        .segment_directions()
        .into_iter()
        .map(left_normal)
        .collect();

    let mut raw = Vec::with_capacity(n);
    raw.push(pts[0] + normals[0] * distance);
    for i in 1..n - 1 {
        raw.push(miter_corner(
            &pts[i - 1],
            &pts[i],
            &pts[i + 1],
            &normals[i - 1],
            &normals[i],
            distance,
            miter_limit,
        ));
    }
    raw.push(pts[n - 1] + normals[n - 2] * distance);
    raw
}

/// Offset of the vertex `corner` between the segments `prev -> corner` and
/// `corner -> next`.
///
/// - Crossing offset lines: the miter point, clipped to `miter_limit * |distance|`.
/// - Parallel offset lines (straight, reversal or zero-length neighbour):
///   the vertex moved along the mean normal.
fn miter_corner(
    prev: &Point2,
    corner: &Point2,
    next: &Point2,
    normal_prev: &Vector2,
    normal_next: &Vector2,
    distance: f64,
    miter_limit: f64,
) -> Point2 {
    let shift_prev = normal_prev * distance;
    let shift_next = normal_next * distance;
    let miter = intersection_of_lines(
        &(prev + shift_prev),
        &(corner + shift_prev),
        &(corner + shift_next),
        &(next + shift_next),
    );

    match miter {
        Some(m) => {
            let limit = miter_limit * distance.abs();
            let arm = m - corner;
            let len = arm.norm();
            if len <= limit {
                m
            } else {
                corner + arm * (limit / len)
            }
        }
        None => match (normal_prev + normal_next).try_normalize(TOLERANCE) {
            Some(mean) => corner + mean * distance,
            None => corner + shift_next,
        },
    }
}
