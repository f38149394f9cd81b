//! Coordinate transformation between the MSK grid, SK-42 and WGS-84

pub mod coordinate;
pub mod datum;
pub mod ellipsoid;
pub mod engine;
pub mod system;
pub mod tmerc;
pub mod transformer;
#[cfg(feature = "proj")]
pub mod proj_backend;

pub use coordinate::Coordinate;
pub use datum::{Datum, DatumTransform};
pub use engine::{ProjectedPoint, ProjectionEngine};
pub use system::CoordinateSystem;
pub use tmerc::TransverseMercator;
pub use transformer::CoordinateTransformer;
