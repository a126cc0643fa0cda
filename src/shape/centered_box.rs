use std::sync::OnceLock;

use crate::error::Result;
use crate::geometry::{Extent, Polygon};
use crate::math::Point2;

use super::{box_signed_distance, distance_covers, ensure_positive, rejected, Shape};

/// An axis-aligned box centered on the origin.
#[derive(Debug, Clone)]
pub struct CenteredBox {
    half_width: f64,
    half_height: f64,
    polygon: OnceLock<Polygon>,
}

impl CenteredBox {
    /// Creates a box of the given full `width` and `height`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Invalid` unless both are positive and
    /// `GeometryError::NonFinite` for non-finite input.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let width = ensure_positive("width", width).inspect_err(rejected("centered box"))?;
        let height = ensure_positive("height", height).inspect_err(rejected("centered box"))?;
        Ok(Self {
            half_width: width * 0.5,
            half_height: height * 0.5,
            polygon: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    #[must_use]
    pub fn half_height(&self) -> f64 {
        self.half_height
    }
}

impl Shape for CenteredBox {
    fn signed_distance(&self, p: &Point2) -> f64 {
        box_signed_distance(p, &Point2::origin(), self.half_width, self.half_height)
    }

    fn as_polygon(&self) -> &Polygon {
        self.polygon.get_or_init(|| {
            let (dx, dy) = (self.half_width, self.half_height);
            Polygon::from_ring(vec![
                Point2::new(dx, dy),
                Point2::new(-dx, dy),
                Point2::new(-dx, -dy),
                Point2::new(dx, -dy),
            ])
        })
    }

    fn extent(&self) -> Extent {
        let (dx, dy) = (self.half_width, self.half_height);
        Extent::new(-dx, dx, -dy, dy)
    }

    fn contains(&self, p: &Point2) -> bool {
        p.x.abs() < self.half_width && p.y.abs() < self.half_height
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
    fn dimensions_are_halved() {
        let b = CenteredBox::new(4.0, 2.0).unwrap();
        assert_abs_diff_eq!(b.half_width(), 2.0);
        assert_abs_diff_eq!(b.half_height(), 1.0);
        assert_abs_diff_eq!(b.signed_distance(&Point2::origin()), -1.0);
        assert_abs_diff_eq!(b.signed_distance(&Point2::new(5.0, 0.0)), 3.0);
    }

    #[test]
    fn corner_is_covered_not_contained() {
        let b = CenteredBox::new(4.0, 2.0).unwrap();
        let corner = Point2::new(2.0, 1.0);
        assert!(!b.contains(&corner));
        assert!(b.covers(&corner));
        assert!(b.covers(&Point2::new(0.5, 0.5)));
        assert!(b.covers(&Point2::new(0.0, 1.0)));
        assert!(!b.covers(&Point2::new(2.5, 0.0)));
    }

    #[test]
    fn polygon_is_cached() {
        let b = CenteredBox::new(4.0, 2.0).unwrap();
        let first = b.as_polygon();
        assert!(std::ptr::eq(first, b.as_polygon()));
        assert_eq!(first.len(), 4);
        assert_eq!(first.points()[0], Point2::new(2.0, 1.0));
        assert!(first.signed_area() > 0.0);
        let e = b.extent();
        assert_eq!(e, Extent::new(-2.0, 2.0, -1.0, 1.0));
        assert_eq!(e, first.extent());
    }

    #[test]
    fn invalid_dimensions() {
        assert!(CenteredBox::new(0.0, 1.0).is_err());
        assert!(CenteredBox::new(1.0, -1.0).is_err());
        assert!(CenteredBox::new(f64::NAN, 1.0).is_err());
    }
}
