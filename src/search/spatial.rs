//! Proximity search in the MSK plane

use crate::error::{Error, Result};
use crate::projection::CoordinateTransformer;
use crate::types::{GeodeticPoint, Neighbor, PlanarPoint, Record};

/// Radius search over a record snapshot.
///
/// Distances are planar Euclidean meters in the MSK grid.
pub struct SpatialQueryEngine<'t> {
    transformer: &'t CoordinateTransformer,
}

impl<'t> SpatialQueryEngine<'t> {
    pub fn new(transformer: &'t CoordinateTransformer) -> Self {
        Self { transformer }
    }

    /// Records within `radius` meters of `origin`, nearest first.
    ///
    /// The boundary is inclusive. Records with non-finite coordinates are
    /// skipped; an invalid origin or radius is an error.
    pub fn nearby<'r>(
        &self,
        records: &'r [Record],
        origin: PlanarPoint,
        radius: f64,
        exclude_id: Option<&str>,
    ) -> Result<Vec<Neighbor<'r>>> {
        nearby(records, origin, radius, exclude_id)
    }

    /// Records near a WGS-84 position. Fails outright if the position
    /// cannot be mapped into the grid.
    pub fn nearby_from_geodetic<'r>(
        &self,
        records: &'r [Record],
        origin: GeodeticPoint,
        radius: f64,
    ) -> Result<Vec<Neighbor<'r>>> {
        let planar = self
            .transformer
            .from_geodetic(origin)
            .map_err(|failure| Error::Query(format!("origin cannot be mapped into the grid: {}", failure)))?;

        nearby(records, planar, radius, None)
    }

    /// Records near another record of the snapshot, excluding that record
    pub fn nearby_record<'r>(
        &self,
        records: &'r [Record],
        reference: &Record,
        radius: f64,
    ) -> Result<Vec<Neighbor<'r>>> {
        nearby(records, reference.planar, radius, Some(&reference.id))
    }
}

/// Records within `radius` meters of `origin`, nearest first
pub fn nearby<'r>(
    records: &'r [Record],
    origin: PlanarPoint,
    radius: f64,
    exclude_id: Option<&str>,
) -> Result<Vec<Neighbor<'r>>> {
    if !origin.is_valid() {
        return Err(Error::Query(format!(
            "origin ({}, {}) is not a finite point",
            origin.x, origin.y
        )));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::Query(format!("radius must be a finite non-negative number, got {}", radius)));
    }

    let mut hits: Vec<Neighbor<'r>> = records
        .iter()
        .filter(|record| exclude_id != Some(record.id.as_str()))
        .filter(|record| record.planar.is_valid())
        .map(|record| Neighbor {
            record,
            distance: origin.distance_to(&record.planar),
        })
        .filter(|hit| hit.distance <= radius)
        .collect();

    // Stable: equal distances keep snapshot order
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;
    use approx::assert_abs_diff_eq;

    fn record(id: &str, x: f64, y: f64) -> Record {
        Record::new(id, id.to_uppercase(), PlanarPoint::new(x, y))
    }

    fn snapshot() -> Vec<Record> {
        vec![
            record("a", 5000.0, 3000.0),
            record("b", 5200.0, 3000.0),
            record("c", 5301.0, 3000.0),
            record("d", 5000.0, 3100.0),
        ]
    }

    #[test]
    fn test_radius_scenario() {
        let records = snapshot();
        let hits = nearby(&records, records[0].planar, 300.0, Some("a")).unwrap();

        let ids: Vec<&str> = hits.iter().map(|hit| hit.record.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b"]);
        assert_abs_diff_eq!(hits[1].distance, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let records = vec![record("edge", 300.0, 0.0)];
        let origin = PlanarPoint::new(0.0, 0.0);

        assert_eq!(nearby(&records, origin, 300.0, None).unwrap().len(), 1);
        assert_eq!(nearby(&records, origin, 300.0 - 1e-6, None).unwrap().len(), 0);

        let beyond = vec![record("out", 300.0 + 1e-6, 0.0)];
        assert!(nearby(&beyond, origin, 300.0, None).unwrap().is_empty());
    }

    #[test]
    fn test_self_exclusion() {
        let records = snapshot();
        for reference in &records {
            let hits = nearby(&records, reference.planar, 1000.0, Some(&reference.id)).unwrap();
            assert!(hits.iter().all(|hit| hit.record.id != reference.id));
        }
    }

    #[test]
    fn test_origin_record_is_returned_without_exclusion() {
        let records = snapshot();
        let hits = nearby(&records, records[0].planar, 10.0, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].distance, 0.0);
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let mut records = snapshot();
        records.push(record("nan", f64::NAN, 3000.0));
        records.push(record("inf", 5000.0, f64::INFINITY));

        let hits = nearby(&records, PlanarPoint::new(5000.0, 3000.0), 1e12, None).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn test_invalid_origin_is_an_error() {
        let records = snapshot();
        let err = nearby(&records, PlanarPoint::new(f64::NAN, 0.0), 300.0, None).unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }

    #[test]
    fn test_invalid_radius_is_an_error() {
        let records = snapshot();
        let origin = records[0].planar;
        assert!(nearby(&records, origin, -1.0, None).is_err());
        assert!(nearby(&records, origin, f64::NAN, None).is_err());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            record("east", 0.0, 10.0),
            record("north", 10.0, 0.0),
            record("west", 0.0, -10.0),
        ];
        let hits = nearby(&records, PlanarPoint::new(0.0, 0.0), 10.0, None).unwrap();
        let ids: Vec<&str> = hits.iter().map(|hit| hit.record.id.as_str()).collect();
        assert_eq!(ids, vec!["east", "north", "west"]);
    }

    #[test]
    fn test_nearby_record() {
        let transformer = CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap();
        let engine = SpatialQueryEngine::new(&transformer);
        let records = snapshot();

        let hits = engine.nearby_record(&records, &records[1], 150.0).unwrap();
        let ids: Vec<&str> = hits.iter().map(|hit| hit.record.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_nearby_from_geodetic() {
        let transformer = CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap();
        let engine = SpatialQueryEngine::new(&transformer);

        let records = vec![
            record("near", 5_700_050.0, 480_000.0),
            record("far", 5_701_000.0, 480_000.0),
        ];
        let here = transformer.to_geodetic(PlanarPoint::new(5_700_000.0, 480_000.0)).unwrap();

        let hits = engine.nearby_from_geodetic(&records, here, 300.0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, "near");
        assert_abs_diff_eq!(hits[0].distance, 50.0, epsilon = 0.01);
    }

    #[test]
    fn test_nearby_from_geodetic_fails_on_bad_origin() {
        let transformer = CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap();
        let engine = SpatialQueryEngine::new(&transformer);
        let records = snapshot();

        let err = engine
            .nearby_from_geodetic(&records, GeodeticPoint::new(f64::NAN, 75.0), 300.0)
            .unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }

    #[test]
    fn test_nearby_from_geodetic_outside_the_zone_is_an_error() {
        let transformer = CoordinateTransformer::new(&ZoneConfig::new(13)).unwrap();
        let engine = SpatialQueryEngine::new(&transformer);
        let records = snapshot();

        let err = engine
            .nearby_from_geodetic(&records, GeodeticPoint::new(40.0, 170.0), 1e9)
            .unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }
}
