mod curve_offset_2d;
mod variable_offset_2d;

pub use curve_offset_2d::CurveOffset2D;
pub use variable_offset_2d::VariableOffset2D;

/// Parameters controlling offset curve construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetParams {
    /// Consecutive output points closer than this are merged (meters).
    pub collapse_tolerance: f64,
    /// Maximum miter distance as a multiple of `|offset|`. Longer miters are
    /// clipped to this length along the miter direction.
    pub miter_limit: f64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            collapse_tolerance: 0.05,
            miter_limit: 4.0,
        }
    }
}
