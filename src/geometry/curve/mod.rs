mod extract;
mod projection;

pub use projection::FractionalFallback;

pub(crate) use extract::filter_close_points;

use std::sync::OnceLock;

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::segment_direction;
use crate::math::{ensure_finite, ensure_finite_point, Point2, Vector2};
use crate::operations::offset::{CurveOffset2D, OffsetParams, VariableOffset2D};

use super::Extent;
use projection::ProjectionHelpers;

/// A location on a curve together with the tangent direction there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectedPoint {
    pub point: Point2,
    /// Tangent angle in radians, counter-clockwise from the +x axis.
    pub direction: f64,
}

impl DirectedPoint {
    #[must_use]
    pub fn new(point: Point2, direction: f64) -> Self {
        Self { point, direction }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.point.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.point.y
    }
}

/// An immutable directed polyline, typically a lane or road center-line.
///
/// Arc length is cached per vertex at construction. Projection helpers and
/// vertex curvature radii are computed on first use and cached; the caches
/// are pure functions of the vertices, so a racing first access from several
/// threads converges on the same value.
#[derive(Debug, Clone)]
pub struct Curve {
    points: Vec<Point2>,
    /// Cumulative arc length at each vertex.
    lengths: Vec<f64>,
    helpers: OnceLock<ProjectionHelpers>,
    vertex_radii: Vec<OnceLock<f64>>,
}

impl Curve {
    /// Creates a curve from an ordered list of points.
    ///
    /// Consecutive points may coincide; zero-length segments are skipped by
    /// the length-based algorithms.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for an empty input and
    /// `GeometryError::NonFinite` for NaN or infinite coordinates.
    pub fn new(points: impl IntoIterator<Item = Point2>) -> Result<Self> {
        let points: Vec<Point2> = points.into_iter().collect();
        if points.is_empty() {
            return Err(GeometryError::Degenerate("curve without points".into()).into());
        }
        for p in &points {
            ensure_finite_point("curve point", p)?;
        }

        let mut lengths = Vec::with_capacity(points.len());
        let mut cumulative = 0.0;
        lengths.push(cumulative);
        for w in points.windows(2) {
            cumulative += (w[1] - w[0]).norm();
            lengths.push(cumulative);
        }

        let vertex_radii = points.iter().map(|_| OnceLock::new()).collect();
        Ok(Self {
            points,
            lengths,
            helpers: OnceLock::new(),
            vertex_radii,
        })
    }

    /// Creates a curve after removing consecutive duplicate points.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::new`].
    pub fn new_cleaned(points: impl IntoIterator<Item = Point2>) -> Result<Self> {
        let mut points: Vec<Point2> = points.into_iter().collect();
        points.dedup();
        Self::new(points)
    }

    /// Creates a curve from `(x, y)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Curve::new`].
    pub fn from_xy(coordinates: &[(f64, f64)]) -> Result<Self> {
        Self::new(coordinates.iter().map(|&(x, y)| Point2::new(x, y)))
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a curve has at least one vertex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Vertex at `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for an invalid index.
    pub fn point(&self, index: usize) -> Result<Point2> {
        self.points.get(index).copied().ok_or_else(|| {
            index_out_of_range("index", index, self.points.len()).into()
        })
    }

    #[must_use]
    pub fn first(&self) -> Point2 {
        self.points[0]
    }

    #[must_use]
    pub fn last(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Total arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.lengths[self.lengths.len() - 1]
    }

    /// Arc length from the first vertex to vertex `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for an invalid index.
    pub fn length_at_index(&self, index: usize) -> Result<f64> {
        self.lengths.get(index).copied().ok_or_else(|| {
            index_out_of_range("index", index, self.lengths.len()).into()
        })
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        // Never empty, the fallback is unreachable.
        Extent::from_points(&self.points).unwrap_or(Extent::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Center of the axis-aligned extent.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        self.extent().center()
    }

    /// Location at arc length `position`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN and
    /// `GeometryError::ParameterOutOfRange` outside `[0, length]`.
    pub fn location(&self, position: f64) -> Result<DirectedPoint> {
        ensure_finite("position", position)?;
        let length = self.length();
        if !(0.0..=length).contains(&position) {
            return Err(GeometryError::out_of_range("position", position, 0.0, length).into());
        }
        Ok(self.interpolate(self.segment_at(position), position))
    }

    /// Location at `fraction` of the arc length.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN and
    /// `GeometryError::ParameterOutOfRange` outside `[0, 1]`.
    pub fn location_fraction(&self, fraction: f64) -> Result<DirectedPoint> {
        ensure_finite("fraction", fraction)?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(GeometryError::out_of_range("fraction", fraction, 0.0, 1.0).into());
        }
        let position = (fraction * self.length()).min(self.length());
        Ok(self.interpolate(self.segment_at(position), position))
    }

    /// Location at `fraction`, clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN.
    pub fn location_fraction_clamped(&self, fraction: f64) -> Result<DirectedPoint> {
        ensure_finite("fraction", fraction)?;
        self.location_fraction(fraction.clamp(0.0, 1.0))
    }

    /// Location at arc length `position`; positions before the start or
    /// beyond the end extrapolate along the first or last segment.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite positions.
    pub fn location_extended(&self, position: f64) -> Result<DirectedPoint> {
        ensure_finite("position", position)?;
        let length = self.length();
        if position < 0.0 {
            let start = self.interpolate(self.segment_at(0.0), 0.0);
            return Ok(extrapolate(&start, position));
        }
        if position > length {
            let end = self.interpolate(self.segment_at(length), length);
            return Ok(extrapolate(&end, position - length));
        }
        Ok(self.interpolate(self.segment_at(position), position))
    }

    /// Extended location at `fraction` of the arc length.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite fractions.
    pub fn location_fraction_extended(&self, fraction: f64) -> Result<DirectedPoint> {
        ensure_finite("fraction", fraction)?;
        self.location_extended(fraction * self.length())
    }

    /// Offsets the curve by a constant distance, positive to the left.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite offset or a curve without length.
    pub fn offset_line(&self, offset: f64) -> Result<Curve> {
        CurveOffset2D::new(self, offset).execute()
    }

    /// Constant offset with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-finite offset or a curve without length.
    pub fn offset_line_with(&self, offset: f64, params: &OffsetParams) -> Result<Curve> {
        CurveOffset2D::new(self, offset).with_params(*params).execute()
    }

    /// Offset varying piecewise-linearly over the given relative fractions.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidRange` for malformed fraction/offset arrays.
    pub fn offset_line_varying(&self, relative_fractions: &[f64], offsets: &[f64]) -> Result<Curve> {
        VariableOffset2D::new(self, relative_fractions, offsets).execute()
    }

    /// Offset varying linearly from `start_offset` to `end_offset`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite offsets or a curve without length.
    pub fn offset_line_linear(&self, start_offset: f64, end_offset: f64) -> Result<Curve> {
        self.offset_line_varying(&[0.0, 1.0], &[start_offset, end_offset])
    }

    /// Index of the segment containing arc length `position`.
    ///
    /// Positions on an interior vertex belong to the segment starting there.
    /// Zero-length segments are never returned when the curve has length.
    pub(crate) fn segment_at(&self, position: f64) -> usize {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        let last = n - 2;
        let length = self.length();
        if position >= length {
            let k = self.lengths.partition_point(|&l| l < length);
            return k.saturating_sub(1).min(last);
        }
        let position = position.max(0.0);
        let i = self.lengths.partition_point(|&l| l <= position);
        i.saturating_sub(1).min(last)
    }

    /// Point and direction at `position` on segment `index`.
    pub(crate) fn interpolate(&self, index: usize, position: f64) -> DirectedPoint {
        if self.points.len() < 2 {
            return DirectedPoint::new(self.points[0], 0.0);
        }
        let a = self.points[index];
        let b = self.points[index + 1];
        let seg_len = self.lengths[index + 1] - self.lengths[index];
        if seg_len <= 0.0 {
            return DirectedPoint::new(a, 0.0);
        }
        let t = (position - self.lengths[index]) / seg_len;
        let d = b - a;
        let point = if t <= 0.0 {
            a
        } else if t >= 1.0 {
            b
        } else {
            a + d * t
        };
        DirectedPoint::new(point, d.y.atan2(d.x))
    }

    /// Unit direction per segment. Zero-length segments take the direction of
    /// the nearest preceding non-degenerate segment, or the following one at
    /// the start of the curve.
    pub(crate) fn segment_directions(&self) -> Vec<Vector2> {
        let raw: Vec<Option<Vector2>> = self
            .points
            .windows(2)
            .map(|w| segment_direction(&w[0], &w[1]))
            .collect();
        let first_valid = raw.iter().flatten().next().copied().unwrap_or(Vector2::x());
        let mut current = first_valid;
        raw.into_iter()
            .map(|d| {
                if let Some(d) = d {
                    current = d;
                }
                current
            })
            .collect()
    }

    pub(crate) fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub(crate) fn ensure_has_length(&self, operation: &str) -> Result<()> {
        if self.points.len() < 2 || self.length() <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "{operation} requires a curve with non-zero length"
            ))
            .into());
        }
        Ok(())
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

fn extrapolate(from: &DirectedPoint, distance: f64) -> DirectedPoint {
    let (sin, cos) = from.direction.sin_cos();
    DirectedPoint::new(
        Point2::new(from.point.x + cos * distance, from.point.y + sin * distance),
        from.direction,
    )
}

#[allow(clippy::cast_precision_loss)]
fn index_out_of_range(parameter: &'static str, index: usize, len: usize) -> GeometryError {
    GeometryError::out_of_range(parameter, index as f64, 0.0, len.saturating_sub(1) as f64)
}
