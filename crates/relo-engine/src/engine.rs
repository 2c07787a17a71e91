//! The relocation engine: row-major matrix traversal and mover sampling.

use tracing::{debug, warn};

use relo_core::{RelocationConfig, RunRng};
use relo_spatial::{EnvelopePolicy, SpatialIndex, ZonePolicy, ZoneSet};

use crate::relocate::relocate;
use crate::{EngineError, EngineResult, Population, RunReport, TransitionMatrix};

/// Orchestrates one relocation run.
///
/// # Type parameter
///
/// `P` selects the containment policy ([`EnvelopePolicy`] by default — the
/// bounding-box approximation of the source data pipeline).  Swap in
/// [`relo_spatial::PolygonPolicy`] at compile time for exact containment
/// with no change to the control flow.
///
/// # Ordering contract
///
/// The matrix is traversed strictly sequentially: origin rows ascending,
/// destinations ascending within each row, the diagonal skipped.  Movers
/// relocated for destination `j` are gone from the origin's residency query
/// for every later destination `j' > j` of the same row — observed, not
/// raced.  The engine is single-threaded by design; each residency query is
/// fully collected before any mutation.
#[derive(Debug)]
pub struct RelocationEngine<P: ZonePolicy = EnvelopePolicy> {
    zones: ZoneSet,
    matrix: TransitionMatrix,
    config: RelocationConfig,
    policy: P,
}

impl RelocationEngine<EnvelopePolicy> {
    /// Engine with the default envelope policy.
    ///
    /// Validates the configuration and the matrix/zone dimensions; a bad
    /// input aborts here, before any mutation.
    pub fn new(
        zones: ZoneSet,
        matrix: TransitionMatrix,
        config: RelocationConfig,
    ) -> EngineResult<Self> {
        Self::with_policy(zones, matrix, config, EnvelopePolicy)
    }
}

impl<P: ZonePolicy> RelocationEngine<P> {
    pub fn with_policy(
        zones: ZoneSet,
        matrix: TransitionMatrix,
        config: RelocationConfig,
        policy: P,
    ) -> EngineResult<Self> {
        config.validate()?;
        if matrix.dim() != zones.len() {
            return Err(EngineError::DimensionMismatch {
                rows: matrix.dim(),
                zones: zones.len(),
            });
        }
        Ok(Self { zones, matrix, config, policy })
    }

    #[inline]
    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Build the spatial index for `population` over this engine's zone
    /// bounds, excluding agents anchored outside the study area.
    pub fn build_index(&self, population: &Population) -> SpatialIndex {
        SpatialIndex::bulk(self.zones.bounds(), &population.anchor_entries())
    }

    /// Execute the run.
    ///
    /// For each ordered `(origin, destination)` zone pair off the diagonal:
    ///
    /// 1. A negative matrix cell is reported and skipped; a zero cell is
    ///    skipped silently with no side effects.
    /// 2. Residents of the origin are queried through the policy.  An empty
    ///    origin bumps the empty-source-cell counter.
    /// 3. `share = value / baseline_population(origin)` — the fraction of
    ///    the zone's *nominal* baseline expected to move, so it may exceed 1
    ///    (the shortfall is absorbed silently) and a zero baseline resolves
    ///    to "every resident moves".
    /// 4. One independent Bernoulli trial per resident selects the movers;
    ///    the realized mover count is binomial, not fixed-size.
    ///
    /// Returns the diagnostic [`RunReport`].  The first fault aborts the
    /// remaining traversal — partial continuation would leave the index and
    /// population in a state with unclear provenance.
    pub fn run(
        &self,
        population: &mut Population,
        index: &mut SpatialIndex,
        rng: &mut RunRng,
    ) -> EngineResult<RunReport> {
        let mut report = RunReport::default();
        let dim = self.matrix.dim();

        for origin_idx in 0..dim {
            let origin = self.zones.zone_at(origin_idx);

            for dest_idx in 0..dim {
                // The diagonal is ignored by policy: no self-relocation.
                if dest_idx == origin_idx {
                    continue;
                }

                let value = self.matrix.value(origin_idx, dest_idx);
                if value < 0.0 {
                    warn!(
                        "negative transition value {value} for {} -> {}, cell skipped",
                        origin.id,
                        self.zones.zone_at(dest_idx).id
                    );
                    continue;
                }
                if value == 0.0 {
                    continue;
                }

                let residents = self.policy.residents(index, origin);
                if residents.is_empty() {
                    report.empty_source_cells += 1;
                    continue;
                }

                // Fraction of the nominal baseline expected to move.  A zero
                // baseline yields an infinite share, and every draw in
                // [0, 1) is below infinity: all residents move.
                let share = value / origin.baseline_population;

                let movers: Vec<_> = residents
                    .into_iter()
                    .filter(|_| rng.random::<f64>() < share)
                    .collect();

                if !movers.is_empty() {
                    debug!(
                        "moving {} agents {} -> {} (share={share:.4}, value={value}, baseline={})",
                        movers.len(),
                        origin.id,
                        self.zones.zone_at(dest_idx).id,
                        origin.baseline_population
                    );
                }

                let destination = self.zones.zone_at(dest_idx);
                for agent in movers {
                    relocate(
                        agent,
                        destination,
                        population,
                        index,
                        &self.policy,
                        self.config.paired_share_threshold,
                        rng,
                    )?;
                    report.relocation_events += 1;
                }

                report.expected_movers += value * self.config.scaling_factor;
            }
        }

        report.move_count_histogram = population.move_count_histogram();
        Ok(report)
    }
}
