//! Core data types for msk-locator

use serde::{Deserialize, Serialize};

/// A point in the local planar grid (MSK), meters.
///
/// `x` runs north, `y` runs east. This is the surveyors' convention, the
/// opposite of the usual screen/GIS ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    /// Northing axis
    pub x: f64,
    /// Easting axis
    pub y: f64,
}

impl PlanarPoint {
    /// Creates a new planar point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true when both axes are finite
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another planar point in meters
    pub fn distance_to(&self, other: &PlanarPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A WGS-84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeodeticPoint {
    /// Creates a new geodetic point
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true when both values are finite and within the
    /// latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A named survey point as supplied by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub planar: PlanarPoint,
    pub elevation: Option<f64>,
    pub note: String,
}

impl Record {
    /// Creates a record with no elevation and an empty note
    pub fn new(id: impl Into<String>, name: impl Into<String>, planar: PlanarPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            planar,
            elevation: None,
            note: String::new(),
        }
    }

    /// Sets the elevation
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Sets the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// A proximity hit: a record and its distance from the query origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor<'a> {
    pub record: &'a Record,
    /// Distance in meters
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_validity() {
        assert!(PlanarPoint::new(1.0, 2.0).is_valid());
        assert!(!PlanarPoint::new(f64::NAN, 2.0).is_valid());
        assert!(!PlanarPoint::new(1.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_distance_symmetry() {
        let a = PlanarPoint::new(5000.0, 3000.0);
        let b = PlanarPoint::new(5123.4, 2890.1);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
        assert_eq!(a.distance_to(&PlanarPoint::new(5003.0, 3004.0)), 5.0);
    }

    #[test]
    fn test_geodetic_validity() {
        assert!(GeodeticPoint::new(51.2, 75.1).is_valid());
        assert!(GeodeticPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeodeticPoint::new(90.5, 10.0).is_valid());
        assert!(!GeodeticPoint::new(10.0, -180.1).is_valid());
        assert!(!GeodeticPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new("rp_2", "P-1", PlanarPoint::new(1.0, 2.0))
            .with_elevation(412.5)
            .with_note("benchmark");
        assert_eq!(record.elevation, Some(412.5));
        assert_eq!(record.note, "benchmark");
    }
}
