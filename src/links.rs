//! Map service deep links

use serde::Serialize;

use crate::projection::CoordinateTransformer;
use crate::types::{GeodeticPoint, PlanarPoint};

/// Zoom level used when none is given
pub const DEFAULT_ZOOM: u8 = 18;

/// Links opening a point in the common map services
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLinks {
    pub google: String,
    pub yandex: String,
}

impl MapLinks {
    /// Builds links for a WGS-84 position
    pub fn new(point: GeodeticPoint, zoom: u8) -> Self {
        Self {
            google: google_maps_url(point, zoom),
            yandex: yandex_maps_url(point, zoom),
        }
    }

    /// Builds links for an MSK point; `None` when it has no geodetic position
    pub fn for_point(transformer: &CoordinateTransformer, planar: PlanarPoint) -> Option<Self> {
        transformer
            .to_geodetic(planar)
            .ok()
            .map(|point| Self::new(point, DEFAULT_ZOOM))
    }
}

/// Google Maps link; takes "lat,lon"
pub fn google_maps_url(point: GeodeticPoint, zoom: u8) -> String {
    format!("https://www.google.com/maps?q={},{}&z={}", point.lat, point.lon, zoom)
}

/// Yandex Maps link; takes "lon,lat"
pub fn yandex_maps_url(point: GeodeticPoint, zoom: u8) -> String {
    format!("https://yandex.ru/maps/?pt={},{}&z={}&l=map", point.lon, point.lat, zoom)
}
