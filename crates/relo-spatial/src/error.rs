//! Spatial-subsystem error type.

use thiserror::Error;

use relo_core::{Envelope, Point, ZoneId};

/// Errors produced by `relo-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("coordinate {point} lies outside the index bounds {bounds}")]
    OutOfBounds { point: Point, bounds: Envelope },

    #[error("zone count mismatch: {geometries} geometries vs {baselines} baseline populations")]
    ZoneCountMismatch { geometries: usize, baselines: usize },

    #[error("zone {zone} has negative baseline population {baseline}")]
    NegativeBaseline { zone: ZoneId, baseline: f64 },

    #[error("zone set is empty")]
    Empty,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
