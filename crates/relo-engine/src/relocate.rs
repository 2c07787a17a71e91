//! Single-agent relocation.
//!
//! Moving an agent touches three pieces of state in a fixed order: the
//! spatial index (remove old anchor, insert new one — exactly once per
//! relocation, regardless of how many secondary locations the agent has),
//! the anchor coordinate itself, and the move counter.  A second independent
//! draw then decides the paired/solo branch for the agent's secondary
//! locations.

use relo_core::{AgentId, RunRng};
use relo_spatial::{SpatialIndex, Zone, ZonePolicy};

use crate::{EngineError, EngineResult, Population};

/// Relocate `agent` into `destination`.
///
/// The paired/solo branch: with probability `paired_share_threshold` the
/// mover joins a destination household that already defines its secondary
/// locations, which are therefore left untouched.  Otherwise the mover
/// relocates solo and every secondary location is re-drawn independently
/// inside the destination (one fresh draw per location, not a shared point).
/// An empty secondary list makes the branch a no-op either way.
///
/// The decision is drawn independently per relocated agent against the
/// run-wide threshold, so two agents nominally moving "together" may resolve
/// differently.
///
/// No failure path exists under normal data: an `agent` missing from
/// `population` means the index and population have diverged, which is a
/// fatal invariant fault.
pub fn relocate<P: ZonePolicy>(
    agent: AgentId,
    destination: &Zone,
    population: &mut Population,
    index: &mut SpatialIndex,
    policy: &P,
    paired_share_threshold: f64,
    rng: &mut RunRng,
) -> EngineResult<()> {
    if agent.index() >= population.count {
        return Err(EngineError::AgentNotFound(agent));
    }

    let new_anchor = policy.draw(destination, rng);

    let old_anchor = population.anchor[agent.index()];
    index.remove(old_anchor, agent);
    // Destination envelopes lie within the index bounds by construction, so
    // a failure here is an invariant fault, not a recoverable out-of-bounds.
    index.insert(new_anchor, agent)?;
    population.anchor[agent.index()] = new_anchor;

    population.move_count[agent.index()] += 1;

    let r2: f64 = rng.random();
    if r2 > paired_share_threshold {
        let secondary = &mut population.secondary[agent.index()];
        for location in secondary.iter_mut() {
            *location = policy.draw(destination, rng);
        }
    }

    Ok(())
}
