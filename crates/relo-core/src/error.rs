//! Core error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into them via `From` impls or wrap it as one variant.  Both patterns are
//! acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

/// Errors produced by `relo-core` itself.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `relo-core`.
pub type CoreResult<T> = Result<T, CoreError>;
