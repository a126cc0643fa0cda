use crate::error::{GeometryError, OperationError, Result};
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::{ensure_finite, Point2};

use super::Curve;

impl Curve {
    /// Sub-curve between arc lengths `start` and `end`, with the boundary
    /// points re-sampled exactly at those positions.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidRange` unless `0 <= start < end <= length`.
    pub fn extract(&self, start: f64, end: f64) -> Result<Curve> {
        let length = self.length();
        if start.is_nan() || end.is_nan() || start < 0.0 || start >= end || end > length {
            return Err(OperationError::InvalidRange(format!(
                "cannot extract [{start}, {end}] from a curve of length {length}"
            ))
            .into());
        }

        let i0 = self.segment_at(start);
        let i1 = self.segment_at(end);
        let lengths = self.lengths();

        let mut points = Vec::with_capacity(i1 - i0 + 2);
        points.push(self.interpolate(i0, start).point);
        for k in (i0 + 1)..=i1 {
            if lengths[k] > start && lengths[k] < end {
                points.push(self.points[k]);
            }
        }
        points.push(self.interpolate(i1, end).point);
        points.dedup();
        Curve::new(points)
    }

    /// Sub-curve between two fractions of the arc length.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidRange` unless `0 <= start < end <= 1`.
    pub fn extract_fractional(&self, start: f64, end: f64) -> Result<Curve> {
        if start.is_nan() || end.is_nan() || start < 0.0 || start >= end || end > 1.0 {
            return Err(OperationError::InvalidRange(format!(
                "cannot extract fractions [{start}, {end}]"
            ))
            .into());
        }
        let length = self.length();
        self.extract(start * length, (end * length).min(length))
    }

    /// The first `position` meters of the curve.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidRange` unless `0 < position < length`.
    pub fn truncate(&self, position: f64) -> Result<Curve> {
        let length = self.length();
        if position.is_nan() || position <= 0.0 || position >= length {
            return Err(OperationError::InvalidRange(format!(
                "cannot truncate a curve of length {length} at {position}"
            ))
            .into());
        }
        self.extract(0.0, position)
    }

    /// The same vertices in opposite order.
    #[must_use]
    pub fn reverse(&self) -> Curve {
        let points: Vec<Point2> = self.points.iter().rev().copied().collect();
        // Non-empty and finite, as the source curve.
        Curve::new(points).unwrap_or_else(|_| self.clone())
    }

    /// Joins curves whose end and start points lie within `tolerance` of each
    /// other. Each shared point is taken once, from the earlier curve.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for an empty list,
    /// `GeometryError::NonFinite` for a non-finite `tolerance` and
    /// `OperationError::Discontinuity` for a gap larger than `tolerance`.
    pub fn concatenate(tolerance: f64, curves: &[Curve]) -> Result<Curve> {
        ensure_finite("tolerance", tolerance)?;
        let Some((first, rest)) = curves.split_first() else {
            return Err(GeometryError::Degenerate("no curves to concatenate".into()).into());
        };
        if rest.is_empty() {
            return Ok(first.clone());
        }

        let mut size = first.len();
        for (index, pair) in curves.windows(2).enumerate() {
            let gap = (pair[0].last() - pair[1].first()).norm();
            if gap > tolerance {
                return Err(OperationError::Discontinuity {
                    index,
                    gap,
                    tolerance,
                }
                .into());
            }
            size += pair[1].len() - 1;
        }

        let mut points = Vec::with_capacity(size);
        points.extend_from_slice(first.points());
        for curve in rest {
            points.extend_from_slice(&curve.points()[1..]);
        }
        Curve::new(points)
    }

    /// Drops vertices closer than `min_distance` to the previously kept
    /// vertex. The last vertex is always kept and replaces its predecessor
    /// when the two are too close.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for a non-finite distance.
    pub fn noise_filtered(&self, min_distance: f64) -> Result<Curve> {
        ensure_finite("min_distance", min_distance)?;
        Curve::new(filter_close_points(&self.points, min_distance))
    }

    /// Ramer-Douglas-Peucker simplification; the end points are kept.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for a non-finite epsilon.
    pub fn simplified(&self, epsilon: f64) -> Result<Curve> {
        ensure_finite("epsilon", epsilon)?;
        let n = self.points.len();
        if n < 3 {
            return Ok(self.clone());
        }

        let mut keep = vec![false; n];
        keep[0] = true;
        keep[n - 1] = true;
        let mut stack = vec![(0, n - 1)];
        while let Some((lo, hi)) = stack.pop() {
            if hi <= lo + 1 {
                continue;
            }
            let (a, b) = (&self.points[lo], &self.points[hi]);
            let (split, max_d) = (lo + 1..hi)
                .map(|i| (i, point_to_segment_dist(&self.points[i], a, b)))
                .fold((lo, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if max_d > epsilon {
                keep[split] = true;
                stack.push((lo, split));
                stack.push((split, hi));
            }
        }

        Curve::new(
            self.points
                .iter()
                .zip(keep)
                .filter_map(|(p, k)| k.then_some(*p)),
        )
    }
}

/// Keeps points at least `min_distance` apart; the last point always survives.
pub(crate) fn filter_close_points(points: &[Point2], min_distance: f64) -> Vec<Point2> {
    let Some((last, body)) = points.split_last() else {
        return Vec::new();
    };
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in body {
        if out.last().is_none_or(|prev| (p - prev).norm() >= min_distance) {
            out.push(*p);
        }
    }
    if out.len() > 1 && out.last().is_some_and(|prev| (last - prev).norm() < min_distance) {
        out.pop();
    }
    out.push(*last);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LanegeomError;
    use approx::assert_abs_diff_eq;

    fn zigzag() -> Curve {
        Curve::from_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (20.0, 10.0)]).unwrap()
    }

    #[test]
    fn extract_full_reproduces_curve() {
        let c = zigzag();
        let e = c.extract(0.0, c.length()).unwrap();
        assert_eq!(e, c);
        let f = c.extract_fractional(0.0, 1.0).unwrap();
        assert_eq!(f, c);
    }

    #[test]
    fn extract_resamples_boundaries() {
        let c = zigzag();
        let e = c.extract(5.0, 25.0).unwrap();
        assert_eq!(
            e.points(),
            &[
                Point2::new(5.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(15.0, 10.0),
            ]
        );
        assert_abs_diff_eq!(e.length(), 20.0);
    }

    #[test]
    fn extract_on_vertices() {
        let c = zigzag();
        let e = c.extract(10.0, 20.0).unwrap();
        assert_eq!(e.points(), &[Point2::new(10.0, 0.0), Point2::new(10.0, 10.0)]);
    }

    #[test]
    fn extract_invalid_ranges() {
        let c = zigzag();
        for (s0, s1) in [(-1.0, 5.0), (5.0, 5.0), (6.0, 5.0), (0.0, 31.0), (f64::NAN, 1.0)] {
            let err = c.extract(s0, s1).unwrap_err();
            assert!(
                matches!(err, LanegeomError::Operation(OperationError::InvalidRange(_))),
                "[{s0}, {s1}] gave {err}"
            );
        }
        assert!(c.extract_fractional(0.5, 1.2).is_err());
    }

    #[test]
    fn truncate_bounds() {
        let c = zigzag();
        let t = c.truncate(15.0).unwrap();
        assert_abs_diff_eq!(t.length(), 15.0);
        assert_eq!(t.last(), Point2::new(10.0, 5.0));
        assert!(c.truncate(0.0).is_err());
        assert!(c.truncate(c.length()).is_err());
    }

    #[test]
    fn double_reverse_is_identity() {
        let c = zigzag();
        let r = c.reverse();
        assert_eq!(r.first(), c.last());
        assert_abs_diff_eq!(r.length(), c.length());
        assert_eq!(r.reverse(), c);
    }

    #[test]
    fn concatenate_shares_points() {
        let a = Curve::from_xy(&[(0.0, 0.0), (5.0, 0.0)]).unwrap();
        let b = Curve::from_xy(&[(5.0, 0.0), (5.0, 5.0)]).unwrap();
        let c = Curve::from_xy(&[(5.0, 5.0), (0.0, 5.0)]).unwrap();
        let joined = Curve::concatenate(0.0, &[a, b, c]).unwrap();
        assert_eq!(joined.len(), 4);
        assert_abs_diff_eq!(joined.length(), 15.0);
    }

    #[test]
    fn concatenate_within_tolerance() {
        let a = Curve::from_xy(&[(0.0, 0.0), (5.0, 0.0)]).unwrap();
        let b = Curve::from_xy(&[(5.0, 0.01), (5.0, 5.0)]).unwrap();
        let joined = Curve::concatenate(0.05, &[a.clone(), b.clone()]).unwrap();
        assert_eq!(joined.points()[1], Point2::new(5.0, 0.0));

        let err = Curve::concatenate(0.001, &[a, b]).unwrap_err();
        assert!(matches!(
            err,
            LanegeomError::Operation(OperationError::Discontinuity { index: 0, .. })
        ));
    }

    #[test]
    fn concatenate_edge_cases() {
        assert!(Curve::concatenate(0.0, &[]).is_err());
        let a = zigzag();
        assert_eq!(Curve::concatenate(0.0, std::slice::from_ref(&a)).unwrap(), a);
    }

    #[test]
    fn concatenate_rejects_nan_tolerance() {
        let a = Curve::from_xy(&[(0.0, 0.0), (1.0, 0.0)]).unwrap();
        let b = Curve::from_xy(&[(50.0, 0.0), (51.0, 0.0)]).unwrap();
        let err = Curve::concatenate(f64::NAN, &[a, b]).unwrap_err();
        assert!(matches!(
            err,
            LanegeomError::Geometry(GeometryError::NonFinite { parameter: "tolerance" })
        ));
    }

    #[test]
    fn noise_filter_keeps_last() {
        let c = Curve::from_xy(&[(0.0, 0.0), (0.01, 0.0), (1.0, 0.0), (1.02, 0.0)]).unwrap();
        let f = c.noise_filtered(0.1).unwrap();
        assert_eq!(f.points(), &[Point2::new(0.0, 0.0), Point2::new(1.02, 0.0)]);
    }

    #[test]
    fn simplify_drops_flat_points() {
        let c = Curve::from_xy(&[(0.0, 0.0), (1.0, 0.1), (2.0, 0.0), (3.0, 2.0), (4.0, 0.0)]).unwrap();
        let s = c.simplified(0.5).unwrap();
        assert_eq!(s.first(), c.first());
        assert_eq!(s.last(), c.last());
        assert!(s.points().contains(&Point2::new(3.0, 2.0)));
        assert!(!s.points().contains(&Point2::new(1.0, 0.1)));
    }
}
