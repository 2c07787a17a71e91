//! Engine error type.
//!
//! Fault taxonomy:
//!
//! - **Data faults** (`DimensionMismatch`, `RaggedRow`, `Parse`, plus the
//!   load errors of `relo-spatial`): malformed input, surfaced before any
//!   mutation begins.
//! - **Invariant faults** (`AgentNotFound`, `Invariant`): index/population
//!   state divergence mid-run.  Always fatal; no local recovery, since
//!   half-applied relocations would leave state with unclear provenance.
//! - Negative matrix cells are *not* errors: they are logged and skipped.
//! - Out-of-range zone or matrix indices are programmer errors and panic.

use thiserror::Error;

use relo_core::{AgentId, CoreError};
use relo_spatial::SpatialError;

/// Errors produced by `relo-engine`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("transition matrix has {rows} rows but the zone set has {zones} zones")]
    DimensionMismatch { rows: usize, zones: usize },

    #[error("transition matrix row {row} has {got} fields, expected {expected}")]
    RaggedRow { row: usize, got: usize, expected: usize },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("agent {0} is in the spatial index but not in the population")]
    AgentNotFound(AgentId),

    #[error("spatial invariant violated: {0}")]
    Invariant(#[from] SpatialError),

    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
