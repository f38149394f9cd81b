use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use log::debug;

use crate::error::Error;
use crate::projection::{Coordinate, CoordinateSystem, CoordinateTransformer};
use crate::search::{SearchMode, SpatialQueryEngine, TextSearchEngine};
use crate::types::{GeodeticPoint, Record};
use super::models::*;

/// Shared by all handlers
pub struct AppState {
    pub transformer: CoordinateTransformer,
    pub records: Vec<Record>,
    pub default_radius: f64,
}

impl AppState {
    fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }
}

pub type SharedState = Arc<AppState>;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

fn from_error(error: Error) -> ApiError {
    let status = match &error {
        Error::Query(_) | Error::UnknownSystem(_) => StatusCode::BAD_REQUEST,
        Error::Transform(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}

pub async fn search_records(
    State(state): State<SharedState>,
    Query(req): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mode = match req.mode.as_deref() {
        Some(mode) => mode.parse::<SearchMode>().map_err(from_error)?,
        None => SearchMode::default(),
    };

    let records: Vec<RecordView> = TextSearchEngine::new()
        .search(&state.records, &req.term, mode, req.normalize)
        .into_iter()
        .map(|record| RecordView::new(record, &state.transformer))
        .collect();

    debug!("Search {:?} ({}) matched {} records", req.term, mode, records.len());

    Ok(Json(SearchResponse {
        count: records.len(),
        records,
    }))
}

pub async fn get_record(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<RecordView>, ApiError> {
    let record = state
        .find(&id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("Unknown record: {}", id)))?;

    Ok(Json(RecordView::new(record, &state.transformer)))
}

pub async fn nearby_record(
    State(state): State<SharedState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let reference = state
        .find(&req.id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("Unknown record: {}", req.id)))?;
    let radius = req.radius.unwrap_or(state.default_radius);

    let hits = SpatialQueryEngine::new(&state.transformer)
        .nearby_record(&state.records, reference, radius)
        .map_err(from_error)?;

    Ok(Json(NearbyResponse {
        origin: reference.planar,
        radius,
        points: hits.iter().map(|hit| NeighborView::new(hit, &state.transformer)).collect(),
    }))
}

pub async fn nearby_location(
    State(state): State<SharedState>,
    Query(req): Query<LocationRequest>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let radius = req.radius.unwrap_or(state.default_radius);
    let position = GeodeticPoint::new(req.latitude, req.longitude);

    let origin = state
        .transformer
        .from_geodetic(position)
        .map_err(|failure| error_response(StatusCode::BAD_REQUEST, format!("Position not in the grid: {}", failure)))?;

    let hits = SpatialQueryEngine::new(&state.transformer)
        .nearby(&state.records, origin, radius, None)
        .map_err(from_error)?;

    Ok(Json(NearbyResponse {
        origin,
        radius,
        points: hits.iter().map(|hit| NeighborView::new(hit, &state.transformer)).collect(),
    }))
}

pub async fn transform_coordinate(
    State(state): State<SharedState>,
    Query(req): Query<TransformRequest>,
) -> Result<Json<TransformResponse>, ApiError> {
    let from = req.from.parse::<CoordinateSystem>().map_err(from_error)?;
    let to = req.to.parse::<CoordinateSystem>().map_err(from_error)?;

    let result = state
        .transformer
        .transform(Coordinate::new(req.x, req.y), from, to)
        .map_err(from_error)?;

    Ok(Json(TransformResponse {
        from: from.to_string(),
        to: to.to_string(),
        x: result.x,
        y: result.y,
    }))
}
