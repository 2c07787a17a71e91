//! Structure-of-Arrays population storage.
//!
//! Every `Vec` field has exactly `count` elements; the `AgentId` value is the
//! index into all of them:
//!
//! ```ignore
//! let home = population.anchor[agent.index()];  // O(1), cache-friendly
//! ```
//!
//! The engine never creates or destroys agents — population membership is
//! fixed at load; only coordinates and move counts mutate.

use std::collections::BTreeMap;

use relo_core::{AgentId, Point};

/// All per-agent state for one relocation run.
pub struct Population {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Anchor ("home") coordinate per agent — the location the spatial index
    /// tracks and zone membership is derived from.
    pub anchor: Vec<Point>,

    /// Ordered non-anchor activity coordinates per agent.  Semantically
    /// linked to the anchor but independently relocatable.
    pub secondary: Vec<Vec<Point>>,

    /// Relocation counter per agent.  Zero until the agent first moves,
    /// incremented on every relocation.
    pub move_count: Vec<u32>,
}

impl Population {
    pub fn new() -> Self {
        Self {
            count: 0,
            anchor: Vec::new(),
            secondary: Vec::new(),
            move_count: Vec::new(),
        }
    }

    /// Materialize a population from snapshot rows, in row order.  The
    /// returned `AgentId`s are positional: row `i` becomes `AgentId(i)`.
    pub fn from_snapshot<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Point, Vec<Point>)>,
    {
        let mut population = Self::new();
        for (anchor, secondary) in rows {
            population.push(anchor, secondary);
        }
        population
    }

    /// Append one agent and return its ID.
    pub fn push(&mut self, anchor: Point, secondary: Vec<Point>) -> AgentId {
        let id = AgentId(self.count as u32);
        self.anchor.push(anchor);
        self.secondary.push(secondary);
        self.move_count.push(0);
        self.count += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// `(AgentId, anchor)` pairs for spatial-index bulk loading.
    pub fn anchor_entries(&self) -> Vec<(AgentId, Point)> {
        self.anchor
            .iter()
            .enumerate()
            .map(|(i, &p)| (AgentId(i as u32), p))
            .collect()
    }

    /// Agents grouped by how often they moved, ascending by move count.
    /// Agents that never moved are omitted.
    pub fn move_count_histogram(&self) -> BTreeMap<u32, usize> {
        let mut histogram = BTreeMap::new();
        for &moves in &self.move_count {
            if moves > 0 {
                *histogram.entry(moves).or_insert(0) += 1;
            }
        }
        histogram
    }
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}
