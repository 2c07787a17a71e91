//! Zone containment and sampling policies.
//!
//! The source data pipeline treats zones as their bounding envelopes for
//! both questions the engine asks — "which agents live here?" and "where
//! does a mover land?".  That approximation is deliberate (grid zones make
//! it exact; irregular zones trade precision for speed) and must not be
//! silently corrected.  It is therefore isolated behind [`ZonePolicy`]:
//! the engine is generic over the policy, and a stricter polygon-exact
//! variant can be swapped in without touching its control flow.

use tracing::debug;

use relo_core::{AgentId, Point, RunRng};

use crate::{SpatialIndex, Zone};

// ── ZonePolicy ────────────────────────────────────────────────────────────────

/// How the engine maps a zone geometry to resident agents and to freshly
/// sampled coordinates.
pub trait ZonePolicy {
    /// Agents currently anchored "in" `zone`, ascending by `AgentId`.
    fn residents(&self, index: &SpatialIndex, zone: &Zone) -> Vec<AgentId>;

    /// Draw a coordinate "inside" `zone` for a relocation target.
    fn draw(&self, zone: &Zone, rng: &mut RunRng) -> Point;
}

// ── EnvelopePolicy ────────────────────────────────────────────────────────────

/// The default bounding-box policy.
///
/// Residency is a rectangle query on the zone envelope; targets are drawn
/// uniformly in `[min_x, max_x) × [min_y, max_y)`.  For a non-convex zone
/// the drawn point may fall outside the polygon — an accepted approximation,
/// not a bug.
#[derive(Debug)]
pub struct EnvelopePolicy;

impl ZonePolicy for EnvelopePolicy {
    fn residents(&self, index: &SpatialIndex, zone: &Zone) -> Vec<AgentId> {
        index.query_rectangle(zone.envelope())
    }

    fn draw(&self, zone: &Zone, rng: &mut RunRng) -> Point {
        let env = zone.envelope();
        Point::new(
            uniform_axis(env.min_x, env.max_x, rng),
            uniform_axis(env.min_y, env.max_y, rng),
        )
    }
}

/// Uniform draw in `[lo, hi)`; degenerate zero-extent axes return `lo`
/// (`gen_range` panics on an empty range).
fn uniform_axis(lo: f64, hi: f64, rng: &mut RunRng) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

// ── PolygonPolicy ─────────────────────────────────────────────────────────────

/// Strict polygon-exact policy.
///
/// Residency post-filters the rectangle query by even-odd containment;
/// targets are rejection-sampled inside the envelope until they land in the
/// polygon, up to `max_attempts` draws.  On exhaustion the last draw is kept
/// (logged) — for any non-degenerate polygon the acceptance probability is
/// the area ratio, so 100 attempts make fallback vanishingly rare.
pub struct PolygonPolicy {
    pub max_attempts: usize,
}

impl Default for PolygonPolicy {
    fn default() -> Self {
        Self { max_attempts: 100 }
    }
}

impl ZonePolicy for PolygonPolicy {
    fn residents(&self, index: &SpatialIndex, zone: &Zone) -> Vec<AgentId> {
        index
            .query_rectangle_points(zone.envelope())
            .into_iter()
            .filter(|(_, p)| zone.polygon().contains(*p))
            .map(|(id, _)| id)
            .collect()
    }

    fn draw(&self, zone: &Zone, rng: &mut RunRng) -> Point {
        let env = zone.envelope();
        let mut point = Point::new(env.min_x, env.min_y);
        for _ in 0..self.max_attempts {
            point = Point::new(
                uniform_axis(env.min_x, env.max_x, rng),
                uniform_axis(env.min_y, env.max_y, rng),
            );
            if zone.polygon().contains(point) {
                return point;
            }
        }
        debug!(
            "rejection sampling exhausted {} attempts for zone {}, keeping envelope draw",
            self.max_attempts, zone.id
        );
        point
    }
}
