//! Zone and application configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Highest 6-degree Gauss-Krüger zone number
pub const MAX_ZONE: u32 = 60;

/// Default number of memoized transforms per engine
pub const DEFAULT_CACHE_CAPACITY: usize = 5000;

/// Default proximity radius in meters
pub const DEFAULT_RADIUS: f64 = 300.0;

/// Bursa-Wolf parameters taking SK-42 (Krassovsky) to WGS-84.
///
/// Translations in meters, rotations in arc-seconds (position vector
/// convention, as PROJ's `+towgs84`), scale in parts per million.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 7]")]
pub struct DatumShift {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub ds_ppm: f64,
}

impl DatumShift {
    /// Standard SK-42 to WGS-84 parameters
    pub const SK42_TO_WGS84: DatumShift = DatumShift {
        dx: 23.92,
        dy: -141.27,
        dz: -80.9,
        rx: 0.0,
        ry: 0.35,
        rz: 0.82,
        ds_ppm: -0.12,
    };

    /// Returns the parameters in `+towgs84` order
    pub fn to_array(&self) -> [f64; 7] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz, self.ds_ppm]
    }

    /// Formats the parameters as a PROJ `+towgs84` value
    pub fn to_towgs84(&self) -> String {
        self.to_array()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl From<[f64; 7]> for DatumShift {
    fn from(p: [f64; 7]) -> Self {
        Self {
            dx: p[0],
            dy: p[1],
            dz: p[2],
            rx: p[3],
            ry: p[4],
            rz: p[5],
            ds_ppm: p[6],
        }
    }
}

impl Default for DatumShift {
    fn default() -> Self {
        Self::SK42_TO_WGS84
    }
}

/// SK-42 zone parameters for one site.
///
/// `zone` stays optional at the deserialization layer so a missing value is
/// reported as a configuration error, not a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ZoneConfig {
    pub zone: Option<i64>,
    #[serde(default)]
    pub datum_shift: DatumShift,
}

impl ZoneConfig {
    /// Creates a zone config with the standard datum shift
    pub fn new(zone: i64) -> Self {
        Self {
            zone: Some(zone),
            datum_shift: DatumShift::default(),
        }
    }

    /// Replaces the datum shift
    pub fn with_datum_shift(mut self, shift: DatumShift) -> Self {
        self.datum_shift = shift;
        self
    }

    /// Checks the zone and datum parameters and returns the zone number
    pub fn validate(&self) -> Result<u32> {
        let zone = self
            .zone
            .ok_or_else(|| Error::Configuration("zone is required".to_string()))?;

        if zone < 1 || zone > MAX_ZONE as i64 {
            return Err(Error::Configuration(format!(
                "zone must be between 1 and {}, got {}",
                MAX_ZONE, zone
            )));
        }

        if !self.datum_shift.is_finite() {
            return Err(Error::Configuration(
                "datum shift parameters must be finite".to_string(),
            ));
        }

        Ok(zone as u32)
    }
}

/// Configuration shared by the CLI and the API server
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub zone: ZoneConfig,
    /// CSV file holding the survey points
    pub records: Option<PathBuf>,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_radius")]
    pub default_radius: f64,
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

impl AppConfig {
    /// Parses a TOML configuration
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.zone.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// A relative `records` path is resolved against the config file's
    /// directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;

        if let (Some(records), Some(dir)) = (config.records.as_ref(), path.parent()) {
            if records.is_relative() {
                config.records = Some(dir.join(records));
            }
        }

        Ok(config)
    }
}
