//! Device position source
//!
//! The engine only needs a WGS-84 fix; where it comes from (a browser, a
//! GNSS receiver, a query string) is up to the provider.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::projection::CoordinateTransformer;
use crate::types::{GeodeticPoint, PlanarPoint};

/// Why a position could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeolocationError::PermissionDenied => write!(f, "Geolocation permission denied"),
            GeolocationError::PositionUnavailable => write!(f, "Position unavailable"),
            GeolocationError::Timeout => write!(f, "Position request timed out"),
            GeolocationError::Unknown => write!(f, "Unknown geolocation error"),
        }
    }
}

impl std::error::Error for GeolocationError {}

/// Anything that can report the current WGS-84 position
pub trait GeolocationProvider {
    fn current_position(&self) -> impl Future<Output = Result<GeodeticPoint, GeolocationError>> + Send;
}

/// A provider that always reports the same outcome
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    outcome: Result<GeodeticPoint, GeolocationError>,
}

impl FixedPosition {
    /// Reports `point`
    pub fn new(point: GeodeticPoint) -> Self {
        Self { outcome: Ok(point) }
    }

    /// Reports `error`
    pub fn failing(error: GeolocationError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<GeodeticPoint, GeolocationError> {
        self.outcome
    }
}

/// Asks the provider for a fix and maps it into the MSK grid.
///
/// The request is abandoned after `timeout`. A fix that cannot be mapped
/// into the grid is reported as `PositionUnavailable`.
pub async fn current_position_planar<P: GeolocationProvider>(
    provider: &P,
    transformer: &CoordinateTransformer,
    timeout: Duration,
) -> Result<(GeodeticPoint, PlanarPoint), GeolocationError> {
    let position = tokio::time::timeout(timeout, provider.current_position())
        .await
        .map_err(|_| GeolocationError::Timeout)??;

    let planar = transformer.from_geodetic(position).map_err(|failure| {
        debug!("Position ({}, {}) not mappable: {}", position.lat, position.lon, failure);
        GeolocationError::PositionUnavailable
    })?;

    Ok((position, planar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;
    use approx::assert_abs_diff_eq;

    struct SlowProvider;

    impl GeolocationProvider for SlowProvider {
        async fn current_position(&self) -> Result<GeodeticPoint, GeolocationError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(GeodeticPoint::new(51.43, 74.71))
        }
    }

    fn transformer() -> CoordinateTransformer {
        CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap()
    }

    #[tokio::test]
    async fn test_fixed_position_maps_to_grid() {
        let transformer = transformer();
        let expected = PlanarPoint::new(5_700_000.0, 480_000.0);
        let fix = transformer.to_geodetic(expected).unwrap();

        let (position, planar) = current_position_planar(&FixedPosition::new(fix), &transformer, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(position, fix);
        assert_abs_diff_eq!(planar.x, expected.x, epsilon = 0.01);
        assert_abs_diff_eq!(planar.y, expected.y, epsilon = 0.01);
    }

    #[tokio::test]
    async fn test_provider_error_is_passed_through() {
        let provider = FixedPosition::failing(GeolocationError::PermissionDenied);
        let err = current_position_planar(&provider, &transformer(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = current_position_planar(&SlowProvider, &transformer(), Duration::from_millis(10))
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::Timeout);
    }

    #[tokio::test]
    async fn test_unmappable_fix() {
        let provider = FixedPosition::new(GeodeticPoint::new(f64::NAN, 74.0));
        let err = current_position_planar(&provider, &transformer(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PositionUnavailable);
    }
}
