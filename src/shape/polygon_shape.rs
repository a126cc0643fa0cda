use crate::error::{Result, ShapeError};
use crate::geometry::Polygon;
use crate::math::Point2;

use super::{polygon_signed_distance, rejected, Shape};

/// An arbitrary simple polygon used as a shape.
#[derive(Debug, Clone)]
pub struct PolygonShape {
    polygon: Polygon,
}

impl PolygonShape {
    /// Creates a shape from a closed ring of at least three points.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Invalid` for fewer than three points and
    /// `GeometryError::NonFinite` for non-finite coordinates.
    pub fn new(points: impl IntoIterator<Item = Point2>) -> Result<Self> {
        Self::checked(points.into_iter().collect()).inspect_err(rejected("polygon"))
    }

    fn checked(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(ShapeError::Invalid(format!(
                "a polygon needs at least 3 points, got {}",
                points.len()
            ))
            .into());
        }
        Ok(Self {
            polygon: Polygon::new(points)?,
        })
    }
}

impl From<PolygonShape> for Polygon {
    fn from(shape: PolygonShape) -> Self {
        shape.polygon
    }
}

impl Shape for PolygonShape {
    fn signed_distance(&self, p: &Point2) -> f64 {
        polygon_signed_distance(self, p)
    }

    fn as_polygon(&self) -> &Polygon {
        &self.polygon
    }
}
