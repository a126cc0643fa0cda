//! Arc sampling helpers used by shape tessellation.

use std::f64::consts::PI;

use super::Point2;

/// Computes the number of line segments needed to approximate an arc of
/// `angle` radians and the given `radius` so that no chord deviates more than
/// `max_spatial_error` from the arc.
///
/// From the sagitta formula `e = r * (1 - cos(theta / 2))` the largest
/// per-segment angle is `theta = 2 * acos(1 - e / r)`. Always at least 1.
#[must_use]
pub fn num_segments_for_radius(max_spatial_error: f64, angle: f64, radius: f64) -> usize {
    let abs_angle = angle.abs();
    if radius < 1e-12 || abs_angle < 1e-12 || max_spatial_error <= 0.0 {
        return 1;
    }
    let max_angle = if max_spatial_error >= radius {
        PI
    } else {
        2.0 * (1.0 - max_spatial_error / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_angle / max_angle).ceil() as usize;
    n.max(1)
}

/// Point on the circle around `center` at `angle` radians.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Samples `segments + 1` points on the arc from `start_angle` to `end_angle`,
/// both ends included.
#[must_use]
pub fn sample_arc(
    center: &Point2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    segments: usize,
) -> Vec<Point2> {
    let segments = segments.max(1);
    #[allow(clippy::cast_precision_loss)]
    let step = (end_angle - start_angle) / segments as f64;
    (0..=segments)
        .map(|k| {
            #[allow(clippy::cast_precision_loss)]
            let angle = if k == segments {
                end_angle
            } else {
                start_angle + step * k as f64
            };
            arc_point_at(center, radius, angle)
        })
        .collect()
}
