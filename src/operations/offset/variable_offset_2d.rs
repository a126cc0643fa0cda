use crate::error::{LanegeomError, OperationError, Result};
use crate::geometry::curve::filter_close_points;
use crate::geometry::Curve;
use crate::math::{ensure_finite, Point2};

use super::{CurveOffset2D, OffsetParams};

/// Offsets a curve by a distance that varies piecewise-linearly along it.
///
/// Control points pair a fraction of the curve length with an offset. One
/// constant offset curve is built per control point; between two control
/// fractions the result blends the two neighbouring offset curves, moving
/// from the first to the second as the span is traversed. Control points
/// with zero offset are implied at fractions 0 and 1 when missing.
#[derive(Debug)]
pub struct VariableOffset2D<'a> {
    curve: &'a Curve,
    fractions: &'a [f64],
    offsets: &'a [f64],
    params: OffsetParams,
}

impl<'a> VariableOffset2D<'a> {
    #[must_use]
    pub fn new(curve: &'a Curve, fractions: &'a [f64], offsets: &'a [f64]) -> Self {
        Self {
            curve,
            fractions,
            offsets,
            params: OffsetParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: OffsetParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the blended offset.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidRange` for malformed control points
    /// - `GeometryError::NonFinite` for non-finite fractions or offsets
    /// - `GeometryError::Degenerate` for a curve without length
    pub fn execute(&self) -> Result<Curve> {
        let controls = self.control_points()?;
        self.curve.ensure_has_length("variable offset")?;

        let offset_curves = controls
            .iter()
            .map(|&(_, offset)| {
                CurveOffset2D::new(self.curve, offset)
                    .with_params(self.params)
                    .execute()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut raw = Vec::new();
        for (k, span) in controls.windows(2).enumerate() {
            let (f0, f1) = (span[0].0, span[1].0);
            let first = offset_curves[k].extract_fractional(f0, f1)?;
            let second = offset_curves[k + 1].extract_fractional(f0, f1)?;
            blend_span(&first, &second, &mut raw)?;
        }
        Curve::new(filter_close_points(&raw, self.params.collapse_tolerance))
    }

    /// Validated `(fraction, offset)` pairs covering `[0, 1]`.
    fn control_points(&self) -> Result<Vec<(f64, f64)>> {
        let (fractions, offsets) = (self.fractions, self.offsets);
        if fractions.len() != offsets.len() {
            return Err(invalid(format!(
                "{} fractions but {} offsets",
                fractions.len(),
                offsets.len()
            )));
        }
        if fractions.len() < 2 {
            return Err(invalid(format!(
                "at least 2 control points are required, got {}",
                fractions.len()
            )));
        }
        for (&f, &o) in fractions.iter().zip(offsets) {
            ensure_finite("relative fraction", f)?;
            ensure_finite("offset", o)?;
        }
        if fractions[0] < 0.0 {
            return Err(invalid(format!("first fraction {} is below 0", fractions[0])));
        }
        let last = fractions[fractions.len() - 1];
        if last > 1.0 {
            return Err(invalid(format!("last fraction {last} is above 1")));
        }
        if let Some(w) = fractions.windows(2).find(|w| w[1] <= w[0]) {
            return Err(invalid(format!(
                "fractions must be strictly ascending, got {} after {}",
                w[1], w[0]
            )));
        }

        let mut controls = Vec::with_capacity(fractions.len() + 2);
        if fractions[0] > 0.0 {
            controls.push((0.0, 0.0));
        }
        controls.extend(fractions.iter().copied().zip(offsets.iter().copied()));
        if last < 1.0 {
            controls.push((1.0, 0.0));
        }
        Ok(controls)
    }
}

fn invalid(message: String) -> LanegeomError {
    OperationError::InvalidRange(message).into()
}

/// Walks the vertices of both curves in order of their length fraction and
/// emits the blend of both curves at each of those fractions.
fn blend_span(first: &Curve, second: &Curve, out: &mut Vec<Point2>) -> Result<()> {
    let ratios = |c: &Curve| -> Vec<f64> {
        let length = c.length();
        c.lengths().iter().map(|l| l / length).collect()
    };
    let (r1, r2) = (ratios(first), ratios(second));

    let (mut i, mut j) = (0, 0);
    while i < r1.len() && j < r2.len() {
        let r = if r1[i] < r2[j] {
            i += 1;
            r1[i - 1]
        } else {
            j += 1;
            r2[j - 1]
        };
        let a = first.location_fraction(r)?.point;
        let b = second.location_fraction(r)?.point;
        out.push(Point2::from(a.coords * (1.0 - r) + b.coords * r));
    }
    Ok(())
}
