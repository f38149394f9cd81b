//! msk-locator - survey point lookup in a local MSK grid
//!
//! msk-locator converts points stored in a local planar engineering grid
//! (MSK) to WGS-84 through the SK-42 Gauss-Krüger zone projection, and
//! answers name and proximity queries over a snapshot of records.
//!
//! # Examples
//!
//! ## Converting a point
//!
//! ```no_run
//! use msk_locator::{CoordinateTransformer, PlanarPoint, ZoneConfig};
//!
//! let transformer = CoordinateTransformer::new(&ZoneConfig::new(13))?;
//! let wgs84 = transformer.to_geodetic(PlanarPoint::new(5_700_000.0, 480_000.0))?;
//! println!("lat={} lon={}", wgs84.lat, wgs84.lon);
//! # Ok::<(), msk_locator::Error>(())
//! ```
//!
//! ## Points within 300 m of a record
//!
//! ```no_run
//! use msk_locator::{dataset, CoordinateTransformer, SpatialQueryEngine, ZoneConfig};
//!
//! let records = dataset::load_records_from_path("points.csv")?;
//! let transformer = CoordinateTransformer::new(&ZoneConfig::new(13))?;
//! let engine = SpatialQueryEngine::new(&transformer);
//!
//! for hit in engine.nearby_record(&records, &records[0], 300.0)? {
//!     println!("{} at {:.1} m", hit.record.name, hit.distance);
//! }
//! # Ok::<(), msk_locator::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod cache;
pub mod projection;
pub mod search;
pub mod dataset;
pub mod geolocation;
pub mod links;
pub mod api;

pub use error::{Error, Result, TransformFailure};
pub use types::{GeodeticPoint, Neighbor, PlanarPoint, Record};
pub use config::{AppConfig, DatumShift, ZoneConfig};
pub use cache::TransformCache;
pub use projection::{Coordinate, CoordinateSystem, CoordinateTransformer, ProjectionEngine};
pub use search::{SearchMode, SpatialQueryEngine, TextSearchEngine};
pub use links::MapLinks;
