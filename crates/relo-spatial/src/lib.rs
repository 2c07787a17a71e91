//! `relo-spatial` — zone geometry, agent spatial index, and containment
//! policies.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`zone`]   | `Zone`, `ZoneSet` (ordered zones + union bounds)           |
//! | [`index`]  | `SpatialIndex` (R-tree over agent anchors)                 |
//! | [`policy`] | `ZonePolicy` trait, `EnvelopePolicy`, `PolygonPolicy`      |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Rayon-parallel entry preparation in `SpatialIndex::bulk`. |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod error;
pub mod index;
pub mod policy;
pub mod zone;


pub use error::{SpatialError, SpatialResult};
pub use index::SpatialIndex;
pub use policy::{EnvelopePolicy, PolygonPolicy, ZonePolicy};
pub use zone::{Zone, ZoneSet};
