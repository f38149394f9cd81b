use crate::config::ZoneConfig;
use crate::error::{Result, TransformFailure};
use crate::projection::coordinate::Coordinate;
use crate::projection::engine::{self, ProjectionEngine};
use crate::projection::system::CoordinateSystem;
use crate::types::{GeodeticPoint, PlanarPoint};

/// Converts between the MSK grid, the SK-42 zone projection and WGS-84.
///
/// MSK differs from SK-42 only by the zone million on the easting axis;
/// MSK `x` is the projection's northing and MSK `y` its easting.
pub struct CoordinateTransformer {
    engine: ProjectionEngine,
    zone_offset: f64,
}

impl CoordinateTransformer {
    /// Creates a transformer for a zone
    pub fn new(config: &ZoneConfig) -> Result<Self> {
        Ok(Self::from_engine(ProjectionEngine::new(config)?))
    }

    /// Creates a transformer whose cache holds at most `capacity` entries
    pub fn with_cache_capacity(config: &ZoneConfig, capacity: usize) -> Result<Self> {
        Ok(Self::from_engine(ProjectionEngine::with_cache_capacity(config, capacity)?))
    }

    fn from_engine(engine: ProjectionEngine) -> Self {
        let zone_offset = engine::zone_offset(engine.zone());

        Self { engine, zone_offset }
    }

    /// MSK point to WGS-84
    pub fn to_geodetic(&self, planar: PlanarPoint) -> std::result::Result<GeodeticPoint, TransformFailure> {
        if !planar.is_valid() {
            return Err(TransformFailure::NonFiniteInput);
        }

        let easting = planar.y + self.zone_offset;
        let northing = planar.x;
        self.engine.project(easting, northing)
    }

    /// WGS-84 position to MSK
    pub fn from_geodetic(&self, point: GeodeticPoint) -> std::result::Result<PlanarPoint, TransformFailure> {
        let projected = self.engine.unproject(point.lat, point.lon)?;

        let planar = PlanarPoint::new(projected.northing, projected.easting - self.zone_offset);
        if planar.is_valid() {
            Ok(planar)
        } else {
            Err(TransformFailure::NonFiniteOutput)
        }
    }

    /// Transforms a coordinate between any two supported systems
    pub fn transform(&self, coord: Coordinate, from: CoordinateSystem, to: CoordinateSystem) -> Result<Coordinate> {
        use CoordinateSystem::*;

        if !coord.is_finite() {
            return Err(TransformFailure::NonFiniteInput.into());
        }

        let result: Coordinate = match (from, to) {
            (Msk, Msk) | (Sk42, Sk42) | (Wgs84, Wgs84) => coord,
            (Msk, Sk42) => Coordinate::new(coord.x, coord.y + self.zone_offset),
            (Sk42, Msk) => Coordinate::new(coord.x, coord.y - self.zone_offset),
            (Msk, Wgs84) => self.to_geodetic(coord.into())?.into(),
            (Wgs84, Msk) => self.from_geodetic(coord.into())?.into(),
            (Sk42, Wgs84) => self.engine.project(coord.y, coord.x)?.into(),
            (Wgs84, Sk42) => {
                let projected = self.engine.unproject(coord.x, coord.y)?;
                Coordinate::new(projected.northing, projected.easting)
            }
        };

        Ok(result)
    }

    /// Transforms multiple coordinates in bulk, stopping at the first failure
    pub fn transform_many(
        &self,
        coords: &[Coordinate],
        from: CoordinateSystem,
        to: CoordinateSystem,
    ) -> Result<Vec<Coordinate>> {
        coords.iter()
            .map(|&coord| self.transform(coord, from, to))
            .collect()
    }

    /// Zone number
    pub fn zone(&self) -> u32 {
        self.engine.zone()
    }

    /// Zone million added to MSK `y` to get the SK-42 easting
    pub fn zone_offset(&self) -> f64 {
        self.zone_offset
    }

    /// Central meridian in degrees East
    pub fn central_meridian(&self) -> f64 {
        engine::central_meridian(self.zone())
    }

    /// False easting of the zone projection
    pub fn false_easting(&self) -> f64 {
        engine::false_easting(self.zone())
    }

    /// EPSG code of the SK-42 zone projection (28400 + zone)
    pub fn epsg(&self) -> u32 {
        28400 + self.zone()
    }

    /// The underlying projection engine
    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
