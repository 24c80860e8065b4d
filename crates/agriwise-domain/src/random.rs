//! Random sources handed to the assessor and the simulated models

use crate::RandomSource;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};

/// OS-seeded generator per call, for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropySource;

impl RandomSource for EntropySource {
    fn rng(&self) -> StdRng {
        StdRng::from_entropy()
    }
}

/// Reproducible sequence of generators
///
/// The n-th call returns a generator seeded with `seed + n`, so a run with
/// the same seed and the same call order replays exactly.
#[derive(Debug)]
pub struct SeededSource {
    next_seed: AtomicU64,
}

impl SeededSource {
    /// Create a source starting at `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            next_seed: AtomicU64::new(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn rng(&self) -> StdRng {
        let seed = self.next_seed.fetch_add(1, Ordering::Relaxed);
        StdRng::seed_from_u64(seed)
    }
}
