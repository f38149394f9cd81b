//! Transverse Mercator (Gauss-Krüger) projection
//!
//! Krüger's series in the third flattening `n`, carried to fourth order.
//! Inside a 6° zone this is accurate to well under a millimetre.

use crate::error::TransformFailure;
use crate::projection::ellipsoid::Ellipsoid;

/// Transverse Mercator parameters for one zone
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    /// Rectifying radius times the scale factor
    k0_ahat: f64,
    beta: [f64; 4],
    delta: [f64; 4],
    /// Geodetic to conformal latitude series
    conformal: [f64; 4],
    /// Conformal to geodetic latitude series
    geodetic: [f64; 4],
}

impl TransverseMercator {
    /// Creates a projection with latitude of origin 0
    pub fn new(
        ellipsoid: &Ellipsoid,
        central_meridian: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.n;
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let e2 = ellipsoid.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e6 * e2;

        let ahat = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        Self {
            central_meridian,
            false_easting,
            false_northing,
            k0_ahat: scale_factor * ahat,
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
                49561.0 * n4 / 161280.0,
            ],
            delta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
                4397.0 * n4 / 161280.0,
            ],
            conformal: [
                e2,
                (5.0 * e4 - e6) / 6.0,
                (104.0 * e6 - 45.0 * e8) / 120.0,
                1237.0 * e8 / 1260.0,
            ],
            geodetic: [
                e2 + e4 + e6 + e8,
                -(7.0 * e4 + 17.0 * e6 + 30.0 * e8) / 6.0,
                (224.0 * e6 + 889.0 * e8) / 120.0,
                -4279.0 * e8 / 1260.0,
            ],
        }
    }

    /// Geodetic (degrees, on this projection's ellipsoid) to
    /// `(easting, northing)` in meters.
    ///
    /// Points 90° or more of longitude from the central meridian are outside
    /// the projection's domain and fail with `OutOfRange`.
    pub fn forward(&self, lat: f64, lon: f64) -> Result<(f64, f64), TransformFailure> {
        let offset = (lon - self.central_meridian + 180.0).rem_euclid(360.0) - 180.0;
        if offset.abs() >= 90.0 {
            return Err(TransformFailure::OutOfRange);
        }

        let phi = lat.to_radians();
        let dlambda = offset.to_radians();

        let s2 = phi.sin().powi(2);
        let [a, b, c, d] = self.conformal;
        let phi_c = phi - phi.sin() * phi.cos() * (a + b * s2 + c * s2 * s2 + d * s2 * s2 * s2);

        let xi = (phi_c.tan() / dlambda.cos()).atan();
        let eta = (phi_c.cos() * dlambda.sin()).atanh();

        let mut x = xi;
        let mut y = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            x += beta * (k * xi).sin() * (k * eta).cosh();
            y += beta * (k * xi).cos() * (k * eta).sinh();
        }

        let easting = self.k0_ahat * y + self.false_easting;
        let northing = self.k0_ahat * x + self.false_northing;

        if easting.is_finite() && northing.is_finite() {
            Ok((easting, northing))
        } else {
            Err(TransformFailure::NonFiniteOutput)
        }
    }

    /// `(easting, northing)` in meters to geodetic degrees `(lat, lon)` on
    /// this projection's ellipsoid
    pub fn inverse(&self, easting: f64, northing: f64) -> Result<(f64, f64), TransformFailure> {
        let xi = (northing - self.false_northing) / self.k0_ahat;
        let eta = (easting - self.false_easting) / self.k0_ahat;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, delta) in self.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= delta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= delta * (k * xi).cos() * (k * eta).sinh();
        }

        let phi_c = (xi_p.sin() / eta_p.cosh()).asin();
        let dlambda = (eta_p.sinh() / xi_p.cos()).atan();

        let s2 = phi_c.sin().powi(2);
        let [a, b, c, d] = self.geodetic;
        let phi = phi_c + phi_c.sin() * phi_c.cos() * (a + b * s2 + c * s2 * s2 + d * s2 * s2 * s2);

        let lat = phi.to_degrees();
        let lon = self.central_meridian + dlambda.to_degrees();

        if lat.is_finite() && lon.is_finite() {
            Ok((lat, lon))
        } else {
            Err(TransformFailure::NonFiniteOutput)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ellipsoid::KRASSOVSKY_1940;
    use approx::assert_abs_diff_eq;

    fn zone13() -> TransverseMercator {
        TransverseMercator::new(&KRASSOVSKY_1940, 75.0, 1.0, 13_500_000.0, 0.0)
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        let tm = zone13();
        let (easting, northing) = tm.forward(0.0, 75.0).unwrap();
        assert_abs_diff_eq!(easting, 13_500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(northing, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_meridian_arc_one_degree() {
        // Krassovsky meridian arc from the equator to 1°N
        let (_, northing) = zone13().forward(1.0, 75.0).unwrap();
        assert_abs_diff_eq!(northing, 110_576.368, epsilon = 0.01);
    }

    #[test]
    fn test_east_of_meridian_is_east_of_false_easting() {
        let (easting, northing) = zone13().forward(51.0, 76.5).unwrap();
        assert!(easting > 13_500_000.0);
        assert_abs_diff_eq!(easting, 13_605_295.779, epsilon = 0.01);
        assert_abs_diff_eq!(northing, 5_653_256.309, epsilon = 0.01);
    }

    #[test]
    fn test_forward_inverse_consistency() {
        let tm = zone13();
        for &(lat, lon) in &[(0.0, 72.0), (43.25, 76.9), (51.43, 74.71), (-27.1, 73.0), (71.9, 77.9)] {
            let (e, n) = tm.forward(lat, lon).unwrap();
            let (lat2, lon2) = tm.inverse(e, n).unwrap();
            assert_abs_diff_eq!(lat, lat2, epsilon = 1e-9);
            assert_abs_diff_eq!(lon, lon2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_divergent_input_fails() {
        // 90° from the central meridian on the equator is the projection's singularity
        let result = zone13().forward(0.0, 165.0);
        assert_eq!(result, Err(TransformFailure::OutOfRange));
    }

    #[test]
    fn test_far_side_of_the_globe_is_rejected() {
        let tm = zone13();
        assert_eq!(tm.forward(40.0, 170.0), Err(TransformFailure::OutOfRange));
        assert_eq!(tm.forward(40.0, -100.0), Err(TransformFailure::OutOfRange));
        assert_eq!(tm.forward(-10.0, -15.0), Err(TransformFailure::OutOfRange));
    }

    #[test]
    fn test_longitude_offset_wraps_across_the_antimeridian() {
        // Zone 60: central meridian 357°, so 0° and 2° lie 3° and 5° east of it
        let tm = TransverseMercator::new(&KRASSOVSKY_1940, 357.0, 1.0, 60_500_000.0, 0.0);
        let (east_of_cm, _) = tm.forward(10.0, 2.0).unwrap();
        assert!(east_of_cm > 60_500_000.0);

        let (wrapped, _) = tm.forward(10.0, -358.0).unwrap();
        assert_abs_diff_eq!(wrapped, east_of_cm, epsilon = 1e-6);

        let (e, n) = tm.forward(10.0, 0.0).unwrap();
        let (lat, lon) = tm.inverse(e, n).unwrap();
        assert_abs_diff_eq!(lat, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lon, 360.0, epsilon = 1e-9);
    }
}
