use axum::{
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower::ServiceBuilder;

use super::handlers::*;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/search", get(search_records))
        .route("/api/nearby", get(nearby_record))
        .route("/api/nearby/location", get(nearby_location))
        .route("/api/transform", get(transform_coordinate))
        .route("/api/records/:id", get(get_record))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
        )
        .with_state(state)
}
