//! Run-wide deterministic RNG wrapper.
//!
//! # Determinism strategy
//!
//! Every random draw in a relocation run — mover selection, coordinate
//! sampling, the paired/solo decision — comes from a single `RunRng` that is
//! passed explicitly through each call.  With a fixed seed, matrix, and
//! population, a run is therefore bit-identical on repetition.  There is no
//! ambient/global generator anywhere in the workspace.
//!
//! If preparation work is ever sharded (the run itself is sequential by
//! contract), each shard must own a deterministically derived sub-generator:
//! see [`RunRng::child`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The run-wide seedable RNG.
///
/// Intentionally `!Sync`: a `RunRng` must never be shared between threads.
/// Derive per-shard children with [`child`](Self::child) instead.
pub struct RunRng(SmallRng);

impl RunRng {
    /// Seed deterministically for a reproducible run.
    pub fn new(seed: u64) -> Self {
        RunRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy — a non-reproducible run.
    pub fn from_entropy() -> Self {
        RunRng(SmallRng::from_entropy())
    }

    /// Derive a child `RunRng` with a different seed offset — useful for
    /// seeding per-shard generators deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> RunRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        RunRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed
    /// type.  `random::<f64>()` draws uniformly in `[0, 1)`.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
