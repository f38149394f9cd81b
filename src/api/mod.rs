//! JSON HTTP API over the search and transform engines

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::{AppState, SharedState};
pub use routes::create_router;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::ZoneConfig;
    use crate::projection::CoordinateTransformer;
    use crate::types::{PlanarPoint, Record};

    fn state() -> SharedState {
        let transformer = CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap();
        let records = vec![
            Record::new("rp_2", "RP-1", PlanarPoint::new(5000.0, 3000.0)),
            Record::new("rp_3", "RP.2", PlanarPoint::new(5200.0, 3000.0)),
            Record::new("rp_4", "GRP 9", PlanarPoint::new(5301.0, 3000.0)),
        ];

        Arc::new(AppState {
            transformer,
            records,
            default_radius: 300.0,
        })
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let response = create_router(state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let (status, json) = get("/api/search?term=rp2&normalize=true").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);
        assert_eq!(json["records"][0]["id"], "rp_3");
        assert!(json["records"][0]["links"]["google"].is_string());
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_mode() {
        let (status, _) = get("/api/search?term=rp&mode=fuzzy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_endpoint() {
        let (status, json) = get("/api/nearby?id=rp_2").await;
        assert_eq!(status, StatusCode::OK);
        let points = json["points"].as_array().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["record"]["id"], "rp_3");
        assert_eq!(points[0]["distance"], 200.0);
    }

    #[tokio::test]
    async fn test_nearby_unknown_record() {
        let (status, _) = get("/api/nearby?id=missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_nearby_location_endpoint() {
        let transformer = CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap();
        let here = transformer.to_geodetic(PlanarPoint::new(5100.0, 3000.0)).unwrap();

        let uri = format!("/api/nearby/location?latitude={}&longitude={}&radius=150", here.lat, here.lon);
        let (status, json) = get(&uri).await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<&str> = json["points"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["record"]["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"rp_2") && ids.contains(&"rp_3"));
    }

    #[tokio::test]
    async fn test_nearby_location_rejects_bad_position() {
        let (status, _) = get("/api/nearby/location?latitude=95&longitude=75").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Beyond the projection's domain rather than a bogus grid origin
        let (status, json) = get("/api/nearby/location?latitude=40&longitude=170&radius=1e12").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_transform_endpoint() {
        let (status, json) = get("/api/transform?x=5700000&y=480000&from=msk&to=sk-42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["to"], "sk42");
        assert_eq!(json["y"], 13_480_000.0);

        let (status, _) = get("/api/transform?x=1&y=2&from=izp&to=msk").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get("/api/transform?x=95&y=75&from=wgs84&to=msk").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_record_endpoint() {
        let (status, json) = get("/api/records/rp_4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "GRP 9");
        assert!(json["geodetic"]["lat"].is_number());

        let (status, _) = get("/api/records/rp_99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
