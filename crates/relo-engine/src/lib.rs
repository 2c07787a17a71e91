//! `relo-engine` — the stochastic population-relocation engine.
//!
//! Given a population of agents anchored inside spatial zones and a
//! zone-to-zone transition matrix of expected migration counts, the engine
//! relocates a probabilistically sampled subset of agents to new zones,
//! keeping the spatial index consistent and tracking per-agent relocation
//! history.  One-shot batch transform; any fault aborts the remaining matrix
//! traversal.
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`population`] | `Population` (SoA agent storage)                       |
//! | [`matrix`]     | `TransitionMatrix` + CSV loader                        |
//! | [`engine`]     | `RelocationEngine` (matrix traversal, mover sampling)  |
//! | [`relocate`]   | single-agent relocation (index update, paired/solo)    |
//! | [`report`]     | `RunReport` counters and histogram                     |
//! | [`error`]      | `EngineError`, `EngineResult<T>`                       |

pub mod engine;
pub mod error;
pub mod matrix;
pub mod population;
pub mod relocate;
pub mod report;

#[cfg(test)]
mod tests;

pub use engine::RelocationEngine;
pub use error::{EngineError, EngineResult};
pub use matrix::TransitionMatrix;
pub use population::Population;
pub use report::RunReport;
