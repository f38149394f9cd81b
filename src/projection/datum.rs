use crate::config::DatumShift;
use crate::error::TransformFailure;
use crate::projection::ellipsoid::{Ellipsoid, KRASSOVSKY_1940, WGS84};

const ARC_SECOND: f64 = std::f64::consts::PI / (180.0 * 3600.0);

const MAX_ITERATIONS: usize = 10;
const LATITUDE_TOLERANCE: f64 = 1e-14;

/// Geodetic datums handled by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datum {
    /// Pulkovo 1942 on the Krassovsky ellipsoid
    Sk42,
    Wgs84,
}

impl Datum {
    /// Returns the reference ellipsoid of the datum
    pub fn ellipsoid(&self) -> &'static Ellipsoid {
        match self {
            Datum::Sk42 => &KRASSOVSKY_1940,
            Datum::Wgs84 => &WGS84,
        }
    }
}

/// Seven-parameter (Bursa-Wolf) shift between SK-42 and WGS-84.
///
/// Points go geodetic -> geocentric on the source ellipsoid at zero height,
/// through the similarity transform, then back to geodetic on the target
/// ellipsoid. Heights are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct DatumTransform {
    translation: [f64; 3],
    /// Rotations in radians
    rotation: [f64; 3],
    /// 1 + ds
    scale: f64,
}

impl DatumTransform {
    /// Creates a datum transform from SK-42 to WGS-84 with the given parameters
    pub fn new(shift: &DatumShift) -> Self {
        Self {
            translation: [shift.dx, shift.dy, shift.dz],
            rotation: [shift.rx * ARC_SECOND, shift.ry * ARC_SECOND, shift.rz * ARC_SECOND],
            scale: 1.0 + shift.ds_ppm * 1e-6,
        }
    }

    /// Returns the source datum
    pub fn from_datum(&self) -> Datum {
        Datum::Sk42
    }

    /// Returns the target datum
    pub fn to_datum(&self) -> Datum {
        Datum::Wgs84
    }

    /// SK-42 `(lat, lon)` degrees to WGS-84 `(lat, lon)` degrees
    pub fn transform(&self, lat: f64, lon: f64) -> Result<(f64, f64), TransformFailure> {
        let source = geodetic_to_geocentric(self.from_datum().ellipsoid(), lat, lon);
        let shifted = self.apply(source);
        geocentric_to_geodetic(self.to_datum().ellipsoid(), shifted)
    }

    /// WGS-84 `(lat, lon)` degrees to SK-42 `(lat, lon)` degrees
    pub fn transform_inverse(&self, lat: f64, lon: f64) -> Result<(f64, f64), TransformFailure> {
        let source = geodetic_to_geocentric(self.to_datum().ellipsoid(), lat, lon);
        let shifted = self.apply_inverse(source);
        geocentric_to_geodetic(self.from_datum().ellipsoid(), shifted)
    }

    fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        let m = self.scale;

        [
            tx + m * (x - rz * y + ry * z),
            ty + m * (rz * x + y - rx * z),
            tz + m * (-ry * x + rx * y + z),
        ]
    }

    /// Transposed rotation, negated translation and inverted scale
    fn apply_inverse(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        let m = self.scale;

        let x = (x - tx) / m;
        let y = (y - ty) / m;
        let z = (z - tz) / m;

        [
            x + rz * y - ry * z,
            -rz * x + y + rx * z,
            ry * x - rx * y + z,
        ]
    }
}

/// Geodetic degrees at zero height to geocentric meters
fn geodetic_to_geocentric(ellipsoid: &Ellipsoid, lat: f64, lon: f64) -> [f64; 3] {
    let phi = lat.to_radians();
    let lambda = lon.to_radians();
    let n = ellipsoid.prime_vertical_radius(phi);

    [
        n * phi.cos() * lambda.cos(),
        n * phi.cos() * lambda.sin(),
        n * (1.0 - ellipsoid.e2) * phi.sin(),
    ]
}

/// Geocentric meters to geodetic degrees, iterating on latitude
fn geocentric_to_geodetic(ellipsoid: &Ellipsoid, [x, y, z]: [f64; 3]) -> Result<(f64, f64), TransformFailure> {
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(TransformFailure::NonFiniteOutput);
    }

    let lambda = y.atan2(x);
    let p = x.hypot(y);
    let mut phi = z.atan2(p * (1.0 - ellipsoid.e2));

    for _ in 0..MAX_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius(phi);
        let h = if phi.cos().abs() > 1e-12 {
            p / phi.cos() - n
        } else {
            z.abs() - ellipsoid.b()
        };
        let next = z.atan2(p * (1.0 - ellipsoid.e2 * n / (n + h)));
        let done = (next - phi).abs() < LATITUDE_TOLERANCE;
        phi = next;
        if done {
            break;
        }
    }

    let lat = phi.to_degrees();
    let lon = lambda.to_degrees();

    if lat.is_finite() && lon.is_finite() {
        Ok((lat, lon))
    } else {
        Err(TransformFailure::NonFiniteOutput)
    }
}
