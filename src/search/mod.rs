//! Proximity and name queries over a record snapshot

pub mod spatial;
pub mod text;

pub use spatial::SpatialQueryEngine;
pub use text::{SearchMode, TextSearchEngine};
