use crate::config::ZoneConfig;
use crate::error::{Error, Result};
use crate::projection::engine;
use crate::types::{GeodeticPoint, PlanarPoint};
use proj::Proj;

/// MSK <-> WGS-84 through PROJ, used to cross-check the native engine
pub struct ProjBackend {
    forward: Proj,
    inverse: Proj,
    definition: String,
    zone_offset: f64,
}

impl ProjBackend {
    /// Builds the SK-42 zone definition and both PROJ pipelines
    pub fn new(config: &ZoneConfig) -> Result<Self> {
        let zone = config.validate()?;

        let definition = format!(
            "+proj=tmerc +lat_0=0 +lon_0={} +k=1 +x_0={} +y_0=0 +ellps=krass +towgs84={} +units=m +no_defs",
            engine::central_meridian(zone),
            engine::false_easting(zone),
            config.datum_shift.to_towgs84()
        );

        let forward = Proj::new_known_crs(&definition, "EPSG:4326", None)
            .map_err(|e| Error::Configuration(format!("Failed to create projection: {}", e)))?;
        let inverse = Proj::new_known_crs("EPSG:4326", &definition, None)
            .map_err(|e| Error::Configuration(format!("Failed to create inverse projection: {}", e)))?;

        Ok(Self {
            forward,
            inverse,
            definition,
            zone_offset: engine::zone_offset(zone),
        })
    }

    /// MSK point to WGS-84
    pub fn to_geodetic(&self, planar: PlanarPoint) -> Option<GeodeticPoint> {
        let (lon, lat) = self.forward.convert((planar.y + self.zone_offset, planar.x)).ok()?;
        Some(GeodeticPoint::new(lat, lon))
    }

    /// WGS-84 position to MSK
    pub fn from_geodetic(&self, point: GeodeticPoint) -> Option<PlanarPoint> {
        let (easting, northing) = self.inverse.convert((point.lon, point.lat)).ok()?;
        Some(PlanarPoint::new(northing, easting - self.zone_offset))
    }

    /// Returns the PROJ definition string
    pub fn definition(&self) -> &str {
        &self.definition
    }
}
