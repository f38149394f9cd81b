use log::debug;

use crate::cache::{CacheKey, Direction, TransformCache};
use crate::config::{ZoneConfig, DEFAULT_CACHE_CAPACITY};
use crate::error::{Result, TransformFailure};
use crate::projection::datum::{Datum, DatumTransform};
use crate::projection::tmerc::TransverseMercator;
use crate::types::GeodeticPoint;

/// A point in the zone's Gauss-Krüger projection, meters.
/// The easting carries the zone number in its millions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub easting: f64,
    pub northing: f64,
}

/// SK-42 Gauss-Krüger zone projection composed with the shift to WGS-84,
/// memoized per instance.
pub struct ProjectionEngine {
    zone: u32,
    projection: TransverseMercator,
    datum: DatumTransform,
    cache: TransformCache,
}

impl ProjectionEngine {
    /// Creates an engine with the default cache capacity
    pub fn new(config: &ZoneConfig) -> Result<Self> {
        Self::with_cache_capacity(config, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates an engine holding at most `capacity` memoized transforms
    pub fn with_cache_capacity(config: &ZoneConfig, capacity: usize) -> Result<Self> {
        let zone = config.validate()?;

        let projection = TransverseMercator::new(
            Datum::Sk42.ellipsoid(),
            central_meridian(zone),
            1.0,
            false_easting(zone),
            0.0,
        );

        Ok(Self {
            zone,
            projection,
            datum: DatumTransform::new(&config.datum_shift),
            cache: TransformCache::new(capacity),
        })
    }

    /// Zone number
    pub fn zone(&self) -> u32 {
        self.zone
    }

    /// Projected coordinates to a WGS-84 position
    pub fn project(&self, easting: f64, northing: f64) -> std::result::Result<GeodeticPoint, TransformFailure> {
        if !(easting.is_finite() && northing.is_finite()) {
            return Err(TransformFailure::NonFiniteInput);
        }

        let key = CacheKey::new(easting, northing, Direction::Forward);
        let (lat, lon) = self.cache.get_or_try_insert_with::<TransformFailure, _>(key, || {
            let (lat, lon) = self.projection.inverse(easting, northing)?;
            let result = self.datum.transform(lat, lon)?;
            debug!(
                "Projected SK-42 zone {} ({}, {}) to WGS84 ({}, {})",
                self.zone, easting, northing, result.0, result.1
            );
            Ok(result)
        })?;

        let point = GeodeticPoint::new(lat, lon);
        if point.is_valid() {
            Ok(point)
        } else {
            Err(TransformFailure::NonFiniteOutput)
        }
    }

    /// A WGS-84 position to projected coordinates
    pub fn unproject(&self, lat: f64, lon: f64) -> std::result::Result<ProjectedPoint, TransformFailure> {
        if !(lat.is_finite() && lon.is_finite()) {
            return Err(TransformFailure::NonFiniteInput);
        }
        if !GeodeticPoint::new(lat, lon).is_valid() {
            return Err(TransformFailure::OutOfRange);
        }

        let key = CacheKey::new(lat, lon, Direction::Inverse);
        let (easting, northing) = self.cache.get_or_try_insert_with::<TransformFailure, _>(key, || {
            let (sk_lat, sk_lon) = self.datum.transform_inverse(lat, lon)?;
            let result = self.projection.forward(sk_lat, sk_lon)?;
            debug!(
                "Unprojected WGS84 ({}, {}) to SK-42 zone {} ({}, {})",
                lat, lon, self.zone, result.0, result.1
            );
            Ok(result)
        })?;

        Ok(ProjectedPoint { easting, northing })
    }

    /// Number of memoized transforms
    pub fn cached_transforms(&self) -> usize {
        self.cache.len()
    }

    /// Drops all memoized transforms
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Central meridian of a 6° zone, degrees East
pub fn central_meridian(zone: u32) -> f64 {
    zone as f64 * 6.0 - 3.0
}

/// The "zone million" prefixed to eastings
pub fn zone_offset(zone: u32) -> f64 {
    zone as f64 * 1_000_000.0
}

/// False easting of a zone, including the zone prefix
pub fn false_easting(zone: u32) -> f64 {
    zone_offset(zone) + 500_000.0
}
