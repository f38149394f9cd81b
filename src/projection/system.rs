//! Coordinate system identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The coordinate systems the transformer converts between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoordinateSystem {
    /// Local engineering grid (x north, y east)
    Msk,
    /// SK-42 Gauss-Krüger zone projection, zone prefix in the easting
    Sk42,
    /// WGS 84 latitude/longitude (EPSG:4326)
    Wgs84,
}

impl CoordinateSystem {
    /// All supported systems
    pub const ALL: [CoordinateSystem; 3] = [
        CoordinateSystem::Msk,
        CoordinateSystem::Sk42,
        CoordinateSystem::Wgs84,
    ];

    /// Canonical tag
    pub fn tag(&self) -> &'static str {
        match self {
            CoordinateSystem::Msk => "msk",
            CoordinateSystem::Sk42 => "sk42",
            CoordinateSystem::Wgs84 => "wgs84",
        }
    }

    /// Whether coordinates are planar meters (as opposed to degrees)
    pub fn is_planar(&self) -> bool {
        !matches!(self, CoordinateSystem::Wgs84)
    }

    /// Get a description of this coordinate system
    pub fn description(&self, zone: u32) -> String {
        match self {
            CoordinateSystem::Msk => "MSK local grid".to_string(),
            CoordinateSystem::Sk42 => format!("SK-42 / Gauss-Kruger zone {} (EPSG:{})", zone, 28400 + zone),
            CoordinateSystem::Wgs84 => "WGS 84 (EPSG:4326)".to_string(),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "msk" | "мск" => Ok(CoordinateSystem::Msk),
            "sk42" | "sk-42" | "ск42" | "ск-42" => Ok(CoordinateSystem::Sk42),
            "wgs84" | "wgs-84" | "epsg:4326" => Ok(CoordinateSystem::Wgs84),
            _ => Err(Error::UnknownSystem(s.to_string())),
        }
    }
}

impl TryFrom<String> for CoordinateSystem {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoordinateSystem> for String {
    fn from(system: CoordinateSystem) -> Self {
        system.tag().to_string()
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
