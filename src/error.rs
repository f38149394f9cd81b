//! Error types for msk-locator

use std::fmt;
use std::io;

/// Result type for msk-locator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reason a single coordinate transform could not produce a point.
///
/// Returned as a value rather than raised: callers rendering many records
/// drop the affected link and carry on with the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformFailure {
    /// An input coordinate was NaN or infinite
    NonFiniteInput,
    /// Geodetic input outside [-90, 90] x [-180, 180]
    OutOfRange,
    /// The projection or datum math diverged
    NonFiniteOutput,
}

impl fmt::Display for TransformFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformFailure::NonFiniteInput => write!(f, "non-finite input coordinate"),
            TransformFailure::OutOfRange => write!(f, "coordinate outside the valid range"),
            TransformFailure::NonFiniteOutput => write!(f, "projection produced a non-finite result"),
        }
    }
}

impl std::error::Error for TransformFailure {}

/// Error types that can occur in msk-locator operations
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Malformed CSV input
    Csv(csv::Error),

    /// Malformed TOML configuration
    Config(toml::de::Error),

    /// JSON encoding failed
    Json(serde_json::Error),

    /// Invalid zone or datum parameters
    Configuration(String),

    /// A coordinate transform failed
    Transform(TransformFailure),

    /// Invalid query (bad origin or radius)
    Query(String),

    /// Coordinate system tag that is not MSK, SK-42 or WGS-84
    UnknownSystem(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Transform(failure) => write!(f, "Transform failed: {}", failure),
            Error::Query(msg) => write!(f, "Invalid query: {}", msg),
            Error::UnknownSystem(tag) => write!(f, "Unknown coordinate system: {}", tag),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Transform(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

impl From<TransformFailure> for Error {
    fn from(failure: TransformFailure) -> Self {
        Error::Transform(failure)
    }
}
