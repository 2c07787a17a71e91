//! The agent spatial index.
//!
//! An R-tree (via `rstar`) over `(x, y) → AgentId` entries, bounded by the
//! study area's union envelope.  The index holds exactly one entry per
//! admitted agent, at that agent's current anchor coordinate; every
//! relocation removes the old entry before inserting the new one.
//!
//! # Query determinism
//!
//! R-tree iteration order depends on the tree's internal structure, which in
//! turn depends on insertion history.  Rectangle queries therefore sort their
//! results by `AgentId` before returning: the order becomes a pure function
//! of index *content*, which keeps relocation runs reproducible under a
//! fixed seed and makes an index rebuilt from current anchors
//! query-equivalent to the incrementally mutated one.

use rstar::{AABB, RTree, RTreeObject};
use tracing::{debug, info, warn};

use relo_core::{AgentId, Envelope, Point};

use crate::{SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[x, y]` point with the agent it
/// anchors.
#[derive(Clone, PartialEq)]
struct AgentEntry {
    point: [f64; 2],
    id: AgentId,
}

impl AgentEntry {
    fn new(point: Point, id: AgentId) -> Self {
        Self { point: [point.x, point.y], id }
    }
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Mutable 2-D point index over agent anchor coordinates.
pub struct SpatialIndex {
    bounds: Envelope,
    tree: RTree<AgentEntry>,
}

impl SpatialIndex {
    /// Empty index covering `bounds`.
    pub fn new(bounds: Envelope) -> Self {
        Self { bounds, tree: RTree::new() }
    }

    /// Bulk-load the index from initial agent anchors.
    ///
    /// Only agents whose anchor lies strictly inside `bounds` are admitted;
    /// the rest are permanently excluded from relocation (logged, not
    /// erred).  Uses `RTree::bulk_load` for O(n log n) construction.  With
    /// the `parallel` feature, entry preparation runs on Rayon.
    pub fn bulk(bounds: Envelope, anchors: &[(AgentId, Point)]) -> SpatialIndex {
        #[cfg(feature = "parallel")]
        let entries: Vec<AgentEntry> = {
            use rayon::prelude::*;
            anchors
                .par_iter()
                .filter(|(_, p)| bounds.contains_interior(*p))
                .map(|&(id, p)| AgentEntry::new(p, id))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let entries: Vec<AgentEntry> = anchors
            .iter()
            .filter(|(_, p)| bounds.contains_interior(*p))
            .map(|&(id, p)| AgentEntry::new(p, id))
            .collect();

        let excluded = anchors.len() - entries.len();
        if excluded > 0 {
            for (id, p) in anchors {
                if !bounds.contains_interior(*p) {
                    debug!("agent {id} anchored at {p} outside {bounds}, excluded");
                }
            }
            info!("excluded {excluded} of {} agents anchored outside the study area", anchors.len());
        }

        Self { bounds, tree: RTree::bulk_load(entries) }
    }

    /// Insert an entry for `agent` at `point`.
    ///
    /// Fails if `point` lies outside the index bounds; callers are expected
    /// to pre-filter at load time, and relocation targets are drawn inside
    /// zone envelopes that the bounds cover by construction.
    pub fn insert(&mut self, point: Point, agent: AgentId) -> SpatialResult<()> {
        if !self.bounds.contains(point) {
            return Err(SpatialError::OutOfBounds { point, bounds: self.bounds });
        }
        self.tree.insert(AgentEntry::new(point, agent));
        Ok(())
    }

    /// Best-effort removal of the entry for `agent` at `point`.
    ///
    /// A miss still succeeds (idempotent under degenerate double dispatch)
    /// but is logged: the caller believed the agent was anchored at `point`,
    /// so a miss signals index/population divergence.  Returns whether the
    /// entry was found.
    pub fn remove(&mut self, point: Point, agent: AgentId) -> bool {
        let found = self.tree.remove(&AgentEntry::new(point, agent)).is_some();
        if !found {
            warn!("remove miss: {agent} not at {point}; index and population may have diverged");
        }
        found
    }

    /// All agents whose anchor falls within the closed rectangle `envelope`,
    /// ascending by `AgentId`.
    pub fn query_rectangle(&self, envelope: Envelope) -> Vec<AgentId> {
        let aabb = Self::aabb(envelope);
        let mut ids: Vec<AgentId> = self.tree.locate_in_envelope(&aabb).map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Like [`query_rectangle`](Self::query_rectangle) but also returns each
    /// agent's stored coordinate, for policies that post-filter by exact
    /// geometry.
    pub fn query_rectangle_points(&self, envelope: Envelope) -> Vec<(AgentId, Point)> {
        let aabb = Self::aabb(envelope);
        let mut entries: Vec<(AgentId, Point)> = self
            .tree
            .locate_in_envelope(&aabb)
            .map(|e| (e.id, Point::new(e.point[0], e.point[1])))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    fn aabb(envelope: Envelope) -> AABB<[f64; 2]> {
        AABB::from_corners(
            [envelope.min_x, envelope.min_y],
            [envelope.max_x, envelope.max_y],
        )
    }

    /// Number of entries (= admitted agents).
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    #[inline]
    pub fn bounds(&self) -> Envelope {
        self.bounds
    }
}
