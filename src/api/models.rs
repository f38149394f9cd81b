use serde::{Deserialize, Serialize};

use crate::links::MapLinks;
use crate::projection::CoordinateTransformer;
use crate::types::{GeodeticPoint, Neighbor, PlanarPoint, Record};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub normalize: bool,
}

#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub id: String,
    pub radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TransformRequest {
    pub x: f64,
    pub y: f64,
    pub from: String,
    pub to: String,
}

/// A record with its geodetic position and map links, when available
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub elevation: Option<f64>,
    pub note: String,
    pub geodetic: Option<GeodeticPoint>,
    pub links: Option<MapLinks>,
}

impl RecordView {
    pub fn new(record: &Record, transformer: &CoordinateTransformer) -> Self {
        let geodetic = transformer.to_geodetic(record.planar).ok();

        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            x: record.planar.x,
            y: record.planar.y,
            elevation: record.elevation,
            note: record.note.clone(),
            geodetic,
            links: geodetic.map(|point| MapLinks::new(point, crate::links::DEFAULT_ZOOM)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub records: Vec<RecordView>,
}

#[derive(Debug, Serialize)]
pub struct NeighborView {
    pub distance: f64,
    pub record: RecordView,
}

impl NeighborView {
    pub fn new(neighbor: &Neighbor<'_>, transformer: &CoordinateTransformer) -> Self {
        Self {
            distance: neighbor.distance,
            record: RecordView::new(neighbor.record, transformer),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub origin: PlanarPoint,
    pub radius: f64,
    pub points: Vec<NeighborView>,
}

#[derive(Debug, Serialize)]
pub struct TransformResponse {
    pub from: String,
    pub to: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
