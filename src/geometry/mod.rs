pub mod curve;
pub mod directed_curve;
pub mod extent;
pub mod polygon;

pub use curve::{Curve, DirectedPoint, FractionalFallback};
pub use directed_curve::DirectedCurve;
pub use extent::Extent;
pub use polygon::Polygon;
