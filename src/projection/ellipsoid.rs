/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Flattening (dimensionless)
    pub f: f64,
    /// First eccentricity squared
    pub e2: f64,
    /// Third flattening: f / (2 - f)
    pub n: f64,
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64) -> Self {
        Self {
            a,
            f,
            e2: 2.0 * f - f * f,
            n: f / (2.0 - f),
        }
    }

    /// Semi-minor axis
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// Prime vertical radius of curvature at a latitude (radians)
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let s = lat.sin();
        self.a / (1.0 - self.e2 * s * s).sqrt()
    }
}

/// Krassovsky 1940, the SK-42 ellipsoid
pub const KRASSOVSKY_1940: Ellipsoid = Ellipsoid::new(6_378_245.0, 1.0 / 298.3);
pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563);
