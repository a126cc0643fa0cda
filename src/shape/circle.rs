use std::f64::consts::TAU;
use std::sync::OnceLock;

use crate::error::Result;
use crate::geometry::{Extent, Polygon};
use crate::math::arc_2d::arc_point_at;
use crate::math::Point2;

use super::{distance_covers, ensure_positive, rejected, Shape, TessellationParams};

/// A circle centered on the origin.
#[derive(Debug, Clone)]
pub struct Circle {
    radius: f64,
    tessellation: TessellationParams,
    polygon: OnceLock<Polygon>,
}

impl Circle {
    /// Creates a circle with the default tessellation.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Invalid` unless `radius` is positive.
    pub fn new(radius: f64) -> Result<Self> {
        Self::with_tessellation(radius, TessellationParams::default())
    }

    /// Creates a circle whose polygon uses `tessellation`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Invalid` unless `radius` is positive.
    pub fn with_tessellation(radius: f64, tessellation: TessellationParams) -> Result<Self> {
        let radius = ensure_positive("radius", radius).inspect_err(rejected("circle"))?;
        Ok(Self {
            radius,
            tessellation,
            polygon: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Shape for Circle {
    fn signed_distance(&self, p: &Point2) -> f64 {
        p.coords.norm() - self.radius
    }

    fn as_polygon(&self) -> &Polygon {
        self.polygon.get_or_init(|| {
            let n = self.tessellation.circle_segments();
            #[allow(clippy::cast_precision_loss)]
            let step = TAU / n as f64;
            let center = Point2::origin();
            Polygon::from_ring(
                (0..n)
                    .map(|k| {
                        #[allow(clippy::cast_precision_loss)]
                        let angle = step * k as f64;
                        arc_point_at(&center, self.radius, angle)
                    })
                    .collect(),
            )
        })
    }

    fn extent(&self) -> Extent {
        let r = self.radius;
        Extent::new(-r, r, -r, r)
    }

    fn contains(&self, p: &Point2) -> bool {
        p.coords.norm() < self.radius
    }

    fn covers(&self, p: &Point2) -> bool {
        distance_covers(self, p)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distance_and_containment() {
        let c = Circle::new(5.0).unwrap();
        assert_abs_diff_eq!(c.signed_distance(&Point2::new(10.0, 0.0)), 5.0);
        assert_abs_diff_eq!(c.signed_distance(&Point2::origin()), -5.0);
        assert!(!c.contains(&Point2::new(3.0, 4.0)));
        assert!(c.contains(&Point2::new(3.0, 3.9)));
    }

    #[test]
    fn covers_the_exact_rim() {
        let c = Circle::new(5.0).unwrap();
        assert!(c.covers(&Point2::new(5.0, 0.0)));
        // On the circle but between two polygon vertices.
        assert!(!c.contains(&Point2::new(3.0, 4.0)));
        assert!(c.covers(&Point2::new(3.0, 4.0)));
        assert!(!c.covers(&Point2::new(3.0, 4.1)));
    }

    #[test]
    fn extent_is_exact_for_coarse_tessellation() {
        let c = Circle::with_tessellation(1.0, TessellationParams { segments_per_circle: 6 }).unwrap();
        assert!(c.as_polygon().extent().max_y < 1.0);
        let e = c.extent();
        assert_abs_diff_eq!(e.min_x, -1.0);
        assert_abs_diff_eq!(e.max_x, 1.0);
        assert_abs_diff_eq!(e.min_y, -1.0);
        assert_abs_diff_eq!(e.max_y, 1.0);
        let inside = Point2::new(0.0, 0.95);
        assert!(c.contains(&inside));
        assert!(inside.y <= e.max_y);
    }

    #[test]
    fn polygon_segments_follow_tessellation() {
        let c = Circle::new(2.0).unwrap();
        assert_eq!(c.as_polygon().len(), 128);
        assert!(std::ptr::eq(c.as_polygon(), c.as_polygon()));
        let coarse = Circle::with_tessellation(2.0, TessellationParams { segments_per_circle: 8 }).unwrap();
        assert_eq!(coarse.as_polygon().len(), 8);
        for p in coarse.as_polygon().points() {
            assert_abs_diff_eq!(p.coords.norm(), 2.0, epsilon = 1e-12);
        }
        let e = c.extent();
        assert_abs_diff_eq!(e.max_x, 2.0);
        assert_abs_diff_eq!(e.min_x, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_radius() {
        assert!(Circle::new(0.0).is_err());
        assert!(Circle::new(-1.0).is_err());
        assert!(Circle::new(f64::INFINITY).is_err());
    }
}
