//! `relo-core` — foundational types for the `rust_relo` relocation toolkit.
//!
//! This crate is a dependency of every other `relo-*` crate.  It intentionally
//! has no `relo-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `ZoneId`                                   |
//! | [`geo`]     | `Point`, `Envelope`, `Polygon`                        |
//! | [`rng`]     | `RunRng` (run-wide seedable generator)                |
//! | [`config`]  | `RelocationConfig`                                    |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RelocationConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Envelope, Point, Polygon};
pub use ids::{AgentId, ZoneId};
pub use rng::RunRng;
