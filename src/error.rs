use thiserror::Error;

/// Top-level error type for the lane geometry kernel.
#[derive(Debug, Error)]
pub enum LanegeomError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric queries and construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite value for {parameter}")]
    NonFinite { parameter: &'static str },
}

/// Errors raised by shape constructors.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("invalid shape: {0}")]
    Invalid(String),
}

/// Errors related to curve transformations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("curve {index} is not connected to its successor: gap {gap} exceeds tolerance {tolerance}")]
    Discontinuity {
        index: usize,
        gap: f64,
        tolerance: f64,
    },
}

/// Convenience type alias for results using [`LanegeomError`].
pub type Result<T> = std::result::Result<T, LanegeomError>;

impl GeometryError {
    pub(crate) fn out_of_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::ParameterOutOfRange {
            parameter,
            value,
            min,
            max,
        }
    }
}
