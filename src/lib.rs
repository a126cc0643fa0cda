pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod shape;

pub use error::{GeometryError, LanegeomError, OperationError, Result, ShapeError};
pub use geometry::{Curve, DirectedCurve, DirectedPoint, Extent, FractionalFallback, Polygon};
pub use math::{Point2, Vector2};
pub use operations::offset::{CurveOffset2D, OffsetParams, VariableOffset2D};
pub use shape::{
    CenteredBox, Circle, PolygonShape, Rectangle, RoundedBox, Shape, TessellationParams,
};
