//! Run configuration.

use crate::{CoreError, CoreResult, RunRng};

/// Top-level relocation-run configuration.
///
/// Typically filled from CLI flags or a config file by the application crate
/// and handed to the engine.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelocationConfig {
    /// Diagnostic scaling applied to the "expected people to move" sum in the
    /// run report.  Never influences control flow.  Default: 0.01.
    pub scaling_factor: f64,

    /// Share of movers that relocate as part of a co-located pair and keep
    /// their secondary locations.  The complementary share re-draws every
    /// secondary location at the destination.  Must lie in [0, 1].
    /// Default: 0.5.
    pub paired_share_threshold: f64,

    /// Master RNG seed.  The same seed always produces identical results;
    /// `None` seeds from OS entropy (non-reproducible run).
    pub seed: Option<u64>,
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self {
            scaling_factor: 0.01,
            paired_share_threshold: 0.5,
            seed: None,
        }
    }
}

impl RelocationConfig {
    /// Check value ranges.  Called by the engine at construction so a bad
    /// config aborts before any mutation begins.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.paired_share_threshold) {
            return Err(CoreError::Config(format!(
                "paired_share_threshold must be in [0, 1], got {}",
                self.paired_share_threshold
            )));
        }
        if !self.scaling_factor.is_finite() || self.scaling_factor < 0.0 {
            return Err(CoreError::Config(format!(
                "scaling_factor must be finite and non-negative, got {}",
                self.scaling_factor
            )));
        }
        Ok(())
    }

    /// Construct the run-wide generator for this configuration.
    pub fn make_rng(&self) -> RunRng {
        match self.seed {
            Some(seed) => RunRng::new(seed),
            None => RunRng::from_entropy(),
        }
    }
}
