use serde::{Deserialize, Serialize};

use crate::types::{GeodeticPoint, PlanarPoint};

/// A coordinate pair in any of the supported systems.
///
/// Planar systems use `x` = northing and `y` = easting; WGS-84 uses
/// `x` = latitude and `y` = longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true when both components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<PlanarPoint> for Coordinate {
    fn from(point: PlanarPoint) -> Self {
        Self::new(point.x, point.y)
    }
}

impl From<GeodeticPoint> for Coordinate {
    fn from(point: GeodeticPoint) -> Self {
        Self::new(point.lat, point.lon)
    }
}

impl From<Coordinate> for PlanarPoint {
    fn from(coord: Coordinate) -> Self {
        PlanarPoint::new(coord.x, coord.y)
    }
}

impl From<Coordinate> for GeodeticPoint {
    fn from(coord: Coordinate) -> Self {
        GeodeticPoint::new(coord.x, coord.y)
    }
}
