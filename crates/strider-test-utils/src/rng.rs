//! Deterministic RNG utilities for reproducible tests.

use rand::SeedableRng;
use rand::rngs::mock::StepRng;
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Scripted source whose every `f64` draw is `0.0`.
///
/// Every eligible stance leg lifts off on its first chance.
pub fn always_exit_rng() -> StepRng {
    StepRng::new(0, 0)
}

/// Scripted source whose every `f64` draw is just below `1.0`.
///
/// No stance leg ever lifts off.
pub fn never_exit_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
