use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{closest_point_on_ring, point_in_ring, ring_edges_cross, signed_area_2d};
use crate::math::{ensure_finite_point, Point2};

use super::Extent;

/// A closed ring of points. The closing edge from the last point back to the
/// first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point2>,
    extent: Extent,
}

impl Polygon {
    /// Creates a polygon from its ring.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for an empty ring and
    /// `GeometryError::NonFinite` for NaN or infinite coordinates.
    pub fn new(points: impl IntoIterator<Item = Point2>) -> Result<Self> {
        let points: Vec<Point2> = points.into_iter().collect();
        for p in &points {
            ensure_finite_point("polygon point", p)?;
        }
        let extent = Extent::from_points(&points)
            .ok_or_else(|| GeometryError::Degenerate("polygon without points".into()))?;
        Ok(Self { points, extent })
    }

    /// Builds a polygon from tessellation output that is finite by construction.
    pub(crate) fn from_ring(points: Vec<Point2>) -> Self {
        let extent = Extent::from_points(&points).unwrap_or(Extent::new(0.0, 0.0, 0.0, 0.0));
        Self { points, extent }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Signed area, positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Closest point on the boundary (including the closing edge) and its distance.
    #[must_use]
    pub fn closest_boundary_point(&self, p: &Point2) -> (Point2, f64) {
        // The ring is never empty, the fallback is unreachable.
        closest_point_on_ring(p, &self.points).unwrap_or((*p, f64::INFINITY))
    }

    /// Strict interior test: points on the boundary are not contained.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        if p.x < self.extent.min_x
            || p.x > self.extent.max_x
            || p.y < self.extent.min_y
            || p.y > self.extent.max_y
        {
            return false;
        }
        let (_, d) = self.closest_boundary_point(p);
        d > 0.0 && point_in_ring(p, &self.points)
    }

    /// Whether the two polygons share any point: crossing edges or one
    /// polygon inside the other.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        if !self.extent.overlaps(&other.extent) {
            return false;
        }
        ring_edges_cross(&self.points, &other.points)
            || point_in_ring(&self.points[0], &other.points)
            || point_in_ring(&other.points[0], &self.points)
    }
}
