use std::f64::consts::FRAC_PI_2;
use std::sync::OnceLock;

use crate::error::{Result, ShapeError};
use crate::geometry::Polygon;
use crate::math::arc_2d::sample_arc;
use crate::math::{ensure_finite, Point2};

use super::{
    box_signed_distance, distance_covers, ensure_positive, rejected, Shape, TessellationParams,
};

/// An origin-centered box with rounded corners.
///
/// The boundary lies at distance `radius` outside a core box shrunk by
/// `radius`. The radius may exceed the half extents, in which case the core
/// box is inverted and the corner arcs overlap; the shape stays valid while
/// the origin remains inside.
#[derive(Debug, Clone)]
pub struct RoundedBox {
    half_width: f64,
    half_height: f64,
    radius: f64,
    tessellation: TessellationParams,
    polygon: OnceLock<Polygon>,
}

impl RoundedBox {
    /// Creates a rounded box of full `width` and `height` with the default
    /// tessellation.
    ///
    /// # Errors
    ///
    /// See [`RoundedBox::with_tessellation`].
    pub fn new(width: f64, height: f64, radius: f64) -> Result<Self> {
        Self::with_tessellation(width, height, radius, TessellationParams::default())
    }

    /// Creates a rounded box whose polygon uses `tessellation`.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Invalid` for non-positive dimensions, a negative
    /// radius, or a radius so large that no net shape remains.
    pub fn with_tessellation(
        width: f64,
        height: f64,
        radius: f64,
        tessellation: TessellationParams,
    ) -> Result<Self> {
        Self::checked(width, height, radius, tessellation).inspect_err(rejected("rounded box"))
    }

    fn checked(width: f64, height: f64, radius: f64, tessellation: TessellationParams) -> Result<Self> {
        let dx = ensure_positive("width", width)? * 0.5;
        let dy = ensure_positive("height", height)? * 0.5;
        let radius = ensure_finite("radius", radius)?;
        if radius < 0.0 {
            return Err(ShapeError::Invalid(format!("negative corner radius {radius}")).into());
        }
        if radius >= dx + dy + (2.0 * dx * dy).sqrt() {
            return Err(ShapeError::Invalid(format!(
                "corner radius {radius} on a {width} x {height} box: no net shape remains"
            ))
            .into());
        }
        Ok(Self {
            half_width: dx,
            half_height: dy,
            radius,
            tessellation,
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

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Corner arc in the first quadrant, counter-clockwise, clipped to the
    /// quadrant.
    fn quarter_arc(&self) -> Vec<Point2> {
        let r = self.radius;
        let center = Point2::new(self.half_width - r, self.half_height - r);
        let (a0, a1) = if r > 0.0 {
            (
                (-center.y / r).clamp(-1.0, 1.0).asin().max(0.0),
                (-center.x / r).clamp(-1.0, 1.0).acos().min(FRAC_PI_2),
            )
        } else {
            (0.0, FRAC_PI_2)
        };
        let segments = (self.tessellation.circle_segments() / 4).max(1);
        let mut arc = sample_arc(&center, r, a0, a1, segments);
        // Clipped ends lie exactly on the axes so mirrored copies coincide.
        if a0 > 0.0 {
            arc[0].y = 0.0;
        }
        if a1 < FRAC_PI_2 {
            arc[segments].x = 0.0;
        }
        arc
    }
}

impl Shape for RoundedBox {
    fn signed_distance(&self, p: &Point2) -> f64 {
        let r = self.radius;
        box_signed_distance(p, &Point2::origin(), self.half_width - r, self.half_height - r) - r
    }

    fn as_polygon(&self) -> &Polygon {
        self.polygon.get_or_init(|| {
            let q1 = self.quarter_arc();
            let mut ring = Vec::with_capacity(q1.len() * 4);
            ring.extend(q1.iter().copied());
            ring.extend(q1.iter().rev().map(|p| Point2::new(-p.x, p.y)));
            ring.extend(q1.iter().map(|p| Point2::new(-p.x, -p.y)));
            ring.extend(q1.iter().rev().map(|p| Point2::new(p.x, -p.y)));
            ring.dedup();
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            Polygon::from_ring(ring)
        })
    }

    fn contains(&self, p: &Point2) -> bool {
        self.signed_distance(p) < 0.0
    }

    fn covers(&self, p: &Point2) -> bool {
        distance_covers(self, p)
    }
}
