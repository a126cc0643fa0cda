//! Bounding shapes with exact signed distances and a cached polygon outline.

mod centered_box;
mod circle;
mod polygon_shape;
mod rectangle;
mod rounded_box;

pub use centered_box::CenteredBox;
pub use circle::Circle;
pub use polygon_shape::PolygonShape;
pub use rectangle::Rectangle;
pub use rounded_box::RoundedBox;

use std::f64::consts::TAU;
use std::fmt::Debug;

use tracing::debug;

use crate::error::{LanegeomError, Result, ShapeError};
use crate::geometry::{Extent, Polygon};
use crate::math::arc_2d::num_segments_for_radius;
use crate::math::{ensure_finite, Point2};

/// Parameters controlling how curved shapes are turned into polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationParams {
    /// Number of segments for a full circle. Quarter arcs use a quarter of it.
    pub segments_per_circle: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            segments_per_circle: 128,
        }
    }
}

impl TessellationParams {
    /// Segment count keeping the chords of a circle of `radius` within
    /// `max_error` of the circle.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for non-finite input and
    /// `ShapeError::Invalid` unless both values are positive.
    pub fn from_max_error(max_error: f64, radius: f64) -> Result<Self> {
        ensure_finite("max error", max_error)?;
        ensure_finite("radius", radius)?;
        if max_error <= 0.0 || radius <= 0.0 {
            return Err(ShapeError::Invalid(format!(
                "tessellation needs a positive error and radius, got {max_error} and {radius}"
            ))
            .into());
        }
        Ok(Self {
            segments_per_circle: num_segments_for_radius(max_error, TAU, radius),
        })
    }

    pub(crate) fn circle_segments(self) -> usize {
        self.segments_per_circle.max(4)
    }
}

/// A closed 2D region.
///
/// Implementors provide an exact signed distance and a polygon outline; the
/// remaining queries default to tests against that outline.
pub trait Shape: Debug + Send + Sync {
    /// Distance to the boundary: negative inside, positive outside.
    fn signed_distance(&self, p: &Point2) -> f64;

    /// Polygon outline, computed once and cached.
    fn as_polygon(&self) -> &Polygon;

    /// Axis-aligned bounds. Defaults to the outline's bounds; shapes with a
    /// closed-form boundary return exact bounds instead.
    fn extent(&self) -> Extent {
        self.as_polygon().extent()
    }

    /// Strict interior test.
    fn contains(&self, p: &Point2) -> bool {
        polygon_contains(self, p)
    }

    /// Interior or exactly on the boundary. Defaults to the polygon outline.
    fn covers(&self, p: &Point2) -> bool {
        polygon_covers(self, p)
    }

    /// Whether the outlines of both shapes overlap.
    fn intersects(&self, other: &dyn Shape) -> bool {
        self.as_polygon().intersects(other.as_polygon())
    }
}

/// Strict point-in-polygon test against the outline.
pub fn polygon_contains<S: Shape + ?Sized>(shape: &S, p: &Point2) -> bool {
    shape.as_polygon().contains(p)
}

/// Distance to the outline, negative when the shape contains `p`.
pub fn polygon_signed_distance<S: Shape + ?Sized>(shape: &S, p: &Point2) -> f64 {
    let (_, distance) = shape.as_polygon().closest_boundary_point(p);
    if shape.contains(p) {
        -distance
    } else {
        distance
    }
}

/// `contains`, or lying exactly on the outline. The outline test is exact,
/// so only points that coincide with the polygon boundary pass it.
#[allow(clippy::float_cmp)]
pub fn polygon_covers<S: Shape + ?Sized>(shape: &S, p: &Point2) -> bool {
    if shape.contains(p) {
        return true;
    }
    let (_, distance) = shape.as_polygon().closest_boundary_point(p);
    distance == 0.0
}

/// `contains`, or a signed distance of exactly zero. For shapes whose
/// boundary has a closed form rather than only a polygon outline.
#[allow(clippy::float_cmp)]
pub fn distance_covers<S: Shape + ?Sized>(shape: &S, p: &Point2) -> bool {
    shape.contains(p) || shape.signed_distance(p) == 0.0
}

/// Signed distance to the axis-aligned box with half extents `half_x` and
/// `half_y` around `center`.
pub(crate) fn box_signed_distance(p: &Point2, center: &Point2, half_x: f64, half_y: f64) -> f64 {
    let qx = (p.x - center.x).abs() - half_x;
    let qy = (p.y - center.y).abs() - half_y;
    qx.max(0.0).hypot(qy.max(0.0)) + qx.max(qy).min(0.0)
}

/// Logs a rejected constructor call for `shape`.
pub(crate) fn rejected(shape: &'static str) -> impl FnOnce(&LanegeomError) {
    move |error| debug!(shape, %error, "rejected shape parameters")
}

/// Finite, strictly positive value or `ShapeError::Invalid`.
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<f64> {
    let value = ensure_finite(parameter, value)?;
    if value <= 0.0 {
        return Err(ShapeError::Invalid(format!("{parameter} must be positive, got {value}")).into());
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn box_distance_formula() {
        let c = Point2::origin();
        assert_abs_diff_eq!(box_signed_distance(&Point2::new(0.0, 0.0), &c, 2.0, 1.0), -1.0);
        assert_abs_diff_eq!(box_signed_distance(&Point2::new(5.0, 0.0), &c, 2.0, 1.0), 3.0);
        assert_abs_diff_eq!(box_signed_distance(&Point2::new(5.0, 5.0), &c, 2.0, 1.0), 5.0);
        assert_abs_diff_eq!(box_signed_distance(&Point2::new(2.0, 1.0), &c, 2.0, 1.0), 0.0);
    }

    #[test]
    fn tessellation_from_error() {
        let p = TessellationParams::from_max_error(0.01, 5.0).unwrap();
        assert_eq!(p.segments_per_circle, 50);
        assert_eq!(TessellationParams::from_max_error(10.0, 5.0).unwrap().segments_per_circle, 2);
        assert!(TessellationParams::from_max_error(0.0, 5.0).is_err());
        assert_eq!(TessellationParams::default().segments_per_circle, 128);
    }

    #[test]
    fn fallbacks_on_polygon_shape() {
        let square = PolygonShape::new([
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ])
        .unwrap();
        assert_abs_diff_eq!(polygon_signed_distance(&square, &Point2::new(1.0, 2.0)), -1.0);
        assert_abs_diff_eq!(polygon_signed_distance(&square, &Point2::new(6.0, 2.0)), 2.0);
        assert!(polygon_contains(&square, &Point2::new(2.0, 2.0)));
        assert!(polygon_covers(&square, &Point2::new(4.0, 1.0)));
        assert!(!polygon_covers(&square, &Point2::new(4.1, 1.0)));
    }

    #[test]
    fn shapes_as_trait_objects() {
        let shapes: Vec<Box<dyn Shape>> = vec![
            Box::new(CenteredBox::new(4.0, 2.0).unwrap()),
            Box::new(Circle::new(1.5).unwrap()),
            Box::new(RoundedBox::new(4.0, 4.0, 1.0).unwrap()),
            Box::new(Rectangle::new(-1.0, 1.0, -1.0, 1.0).unwrap()),
        ];
        for s in &shapes {
            assert!(s.contains(&Point2::origin()), "{s:?}");
            assert!(s.signed_distance(&Point2::origin()) < 0.0);
            assert!(s.intersects(&*shapes[0]));
        }
        let far = Circle::new(1.0).unwrap();
        let moved = Rectangle::new(10.0, 11.0, 10.0, 11.0).unwrap();
        assert!(!far.intersects(&moved));
    }
}
