pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

use crate::error::{GeometryError, Result};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Precision used when selecting and validating fractional projection candidates.
pub const FRACTION_PRECISION: f64 = 2e-5;

/// Sine of the smallest angle at which two lines are still considered to intersect.
pub const INTERSECTION_EPSILON: f64 = 1e-12;

/// Fails with [`GeometryError::NonFinite`] when `value` is NaN or infinite.
///
/// # Errors
///
/// Returns `GeometryError::NonFinite` naming `parameter`.
pub fn ensure_finite(parameter: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { parameter }.into())
    }
}

/// Fails with [`GeometryError::NonFinite`] when either coordinate is NaN or infinite.
///
/// # Errors
///
/// Returns `GeometryError::NonFinite` naming `parameter`.
pub fn ensure_finite_point(parameter: &'static str, point: &Point2) -> Result<()> {
    ensure_finite(parameter, point.x)?;
    ensure_finite(parameter, point.y)?;
    Ok(())
}

/// Normalizes an angle to `(-pi, pi]`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}
