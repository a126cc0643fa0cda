use std::f64::consts::PI;

use crate::error::Result;
use crate::math::polygon_2d::left_normal;
use crate::math::{ensure_finite, normalize_angle, Vector2};

use super::curve::{Curve, DirectedPoint, FractionalFallback};

/// A curve with explicit tangent directions at both ends.
///
/// The end directions describe how the curve continues into its neighbours,
/// so that projection zones and offsets line up across curve boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedCurve {
    curve: Curve,
    start_direction: f64,
    end_direction: f64,
}

impl DirectedCurve {
    /// Creates a directed curve. Directions are angles in radians.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for non-finite directions.
    pub fn new(curve: Curve, start_direction: f64, end_direction: f64) -> Result<Self> {
        ensure_finite("start direction", start_direction)?;
        ensure_finite("end direction", end_direction)?;
        Ok(Self {
            curve,
            start_direction,
            end_direction,
        })
    }

    /// Directed curve whose end directions are the tangents of its own first
    /// and last segment.
    #[must_use]
    pub fn from_curve(curve: Curve) -> Self {
        let len = curve.length();
        let start_direction = curve.interpolate(curve.segment_at(0.0), 0.0).direction;
        let end_direction = curve.interpolate(curve.segment_at(len), len).direction;
        Self {
            curve,
            start_direction,
            end_direction,
        }
    }

    #[must_use]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    #[must_use]
    pub fn start_direction(&self) -> f64 {
        self.start_direction
    }

    #[must_use]
    pub fn end_direction(&self) -> f64 {
        self.end_direction
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    /// See [`Curve::location`].
    ///
    /// # Errors
    ///
    /// Same as [`Curve::location`].
    pub fn location(&self, position: f64) -> Result<DirectedPoint> {
        self.curve.location(position)
    }

    /// See [`Curve::location_fraction`].
    ///
    /// # Errors
    ///
    /// Same as [`Curve::location_fraction`].
    pub fn location_fraction(&self, fraction: f64) -> Result<DirectedPoint> {
        self.curve.location_fraction(fraction)
    }

    /// See [`Curve::location_extended`].
    ///
    /// # Errors
    ///
    /// Same as [`Curve::location_extended`].
    pub fn location_extended(&self, position: f64) -> Result<DirectedPoint> {
        self.curve.location_extended(position)
    }

    /// See [`Curve::location_fraction_extended`].
    ///
    /// # Errors
    ///
    /// Same as [`Curve::location_fraction_extended`].
    pub fn location_fraction_extended(&self, fraction: f64) -> Result<DirectedPoint> {
        self.curve.location_fraction_extended(fraction)
    }

    /// Fractional projection using the stored end directions.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::project_fractional`].
    pub fn project_fractional(&self, x: f64, y: f64, fallback: FractionalFallback) -> Result<f64> {
        self.curve.project_fractional(
            Some(self.start_direction),
            Some(self.end_direction),
            x,
            y,
            fallback,
        )
    }

    /// Constant offset whose end points sit on the normals of the stored end
    /// directions rather than on those of the end segments.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::offset_line`].
    pub fn directional_offset_line(&self, offset: f64) -> Result<Curve> {
        let offset_curve = self.curve.offset_line(offset)?;
        let mut points = offset_curve.points().to_vec();
        let last = points.len() - 1;
        points[0] = self.curve.first() + normal_of(self.start_direction) * offset;
        points[last] = self.curve.last() + normal_of(self.end_direction) * offset;
        Curve::new(points)
    }

    /// Directed sub-curve between two arc lengths. A boundary at a curve end
    /// keeps the stored direction; other boundaries take the curve tangent.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::extract`].
    pub fn extract(&self, start: f64, end: f64) -> Result<Self> {
        let curve = self.curve.extract(start, end)?;
        #[allow(clippy::float_cmp)]
        let at_end = end == self.curve.length();
        Ok(self.bounded(curve, start == 0.0, at_end))
    }

    /// Directed sub-curve between two fractions of the arc length.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::extract_fractional`].
    pub fn extract_fractional(&self, start: f64, end: f64) -> Result<Self> {
        let curve = self.curve.extract_fractional(start, end)?;
        #[allow(clippy::float_cmp)]
        let at_end = end == 1.0;
        Ok(self.bounded(curve, start == 0.0, at_end))
    }

    /// Wraps a piece of this curve. Boundaries inside the curve take the
    /// tangent of the piece itself, so a boundary on a vertex uses the
    /// segment that lies inside the piece.
    fn bounded(&self, curve: Curve, at_start: bool, at_end: bool) -> Self {
        let start_direction = if at_start {
            self.start_direction
        } else {
            curve.interpolate(curve.segment_at(0.0), 0.0).direction
        };
        let end_direction = if at_end {
            self.end_direction
        } else {
            let length = curve.length();
            curve.interpolate(curve.segment_at(length), length).direction
        };
        Self {
            curve,
            start_direction,
            end_direction,
        }
    }

    /// The reversed curve; end directions swap and turn around.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self {
            curve: self.curve.reverse(),
            start_direction: normalize_angle(self.end_direction + PI),
            end_direction: normalize_angle(self.start_direction + PI),
        }
    }

    /// See [`Curve::projected_radius`].
    ///
    /// # Errors
    ///
    /// Same as [`Curve::projected_radius`].
    pub fn projected_radius(&self, fraction: f64) -> Result<f64> {
        self.curve.projected_radius(fraction)
    }
}

fn normal_of(direction: f64) -> Vector2 {
    let (sin, cos) = direction.sin_cos();
    left_normal(Vector2::new(cos, sin))
}

impl From<DirectedCurve> for Curve {
    fn from(directed: DirectedCurve) -> Self {
        directed.curve
    }
}

impl AsRef<Curve> for DirectedCurve {
    fn as_ref(&self) -> &Curve {
        &self.curve
    }
}
