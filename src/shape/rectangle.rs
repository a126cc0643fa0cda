use std::sync::OnceLock;

use crate::error::{Result, ShapeError};
use crate::geometry::{Extent, Polygon};
use crate::math::{ensure_finite, Point2};

use super::{box_signed_distance, distance_covers, rejected, Shape};

/// An axis-aligned rectangle given by its bounds.
#[derive(Debug, Clone)]
pub struct Rectangle {
    bounds: Extent,
    polygon: OnceLock<Polygon>,
}

impl Rectangle {
    /// Creates a rectangle from its bounds.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Invalid` unless `min_x < max_x` and
    /// `min_y < max_y`, and `GeometryError::NonFinite` for non-finite bounds.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        Self::checked(min_x, max_x, min_y, max_y).inspect_err(rejected("rectangle"))
    }

    fn checked(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        for (parameter, value) in [("min_x", min_x), ("max_x", max_x), ("min_y", min_y), ("max_y", max_y)] {
            ensure_finite(parameter, value)?;
        }
        if min_x >= max_x || min_y >= max_y {
            return Err(ShapeError::Invalid(format!(
                "rectangle bounds x [{min_x}, {max_x}] y [{min_y}, {max_y}] are empty"
            ))
            .into());
        }
        Ok(Self {
            bounds: Extent::new(min_x, max_x, min_y, max_y),
            polygon: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn bounds(&self) -> Extent {
        self.bounds
    }
}

impl Shape for Rectangle {
    fn signed_distance(&self, p: &Point2) -> f64 {
        let b = &self.bounds;
        box_signed_distance(p, &b.center(), 0.5 * b.width(), 0.5 * b.height())
    }

    fn as_polygon(&self) -> &Polygon {
        self.polygon.get_or_init(|| {
            let b = &self.bounds;
            Polygon::from_ring(vec![
                Point2::new(b.min_x, b.min_y),
                Point2::new(b.max_x, b.min_y),
                Point2::new(b.max_x, b.max_y),
                Point2::new(b.min_x, b.max_y),
            ])
        })
    }

    fn extent(&self) -> Extent {
        self.bounds
    }

    fn contains(&self, p: &Point2) -> bool {
        let b = &self.bounds;
        p.x > b.min_x && p.x < b.max_x && p.y > b.min_y && p.y < b.max_y
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
    fn off_center_distance() {
        let r = Rectangle::new(2.0, 6.0, 1.0, 3.0).unwrap();
        assert_abs_diff_eq!(r.signed_distance(&Point2::new(4.0, 2.0)), -1.0);
        assert_abs_diff_eq!(r.signed_distance(&Point2::new(9.0, 7.0)), 5.0);
        assert_abs_diff_eq!(r.signed_distance(&Point2::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn bounds_are_exclusive_for_contains() {
        let r = Rectangle::new(2.0, 6.0, 1.0, 3.0).unwrap();
        assert!(r.contains(&Point2::new(3.0, 2.0)));
        assert!(!r.contains(&Point2::new(2.0, 2.0)));
        assert!(r.covers(&Point2::new(2.0, 2.0)));
        assert_eq!(r.extent(), r.as_polygon().extent());
    }

    #[test]
    fn empty_bounds_are_rejected() {
        assert!(Rectangle::new(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(Rectangle::new(0.0, 1.0, 2.0, 1.0).is_err());
        assert!(Rectangle::new(0.0, f64::NAN, 0.0, 1.0).is_err());
    }
}
