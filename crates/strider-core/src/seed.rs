//! Deterministic seed derivation for reproducible planning.
//!
//! ```text
//! Session seed
//! └── Tick seed (per control tick)
//!     └── Candidate seed (per sampled schedule)
//! ```
//!
//! Every candidate schedule in a tick draws from its own stream so that
//! parallel and sequential evaluation produce the same plan.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Derive a child seed from a parent seed and a string key.
///
/// Uses `DefaultHasher` (SipHash-1-3) for fast, deterministic mixing.
///
/// # Example
///
/// ```
/// use strider_core::seed::derive_seed;
///
/// let child = derive_seed(42, "planner");
/// assert_ne!(child, 42);
/// assert_eq!(child, derive_seed(42, "planner"));
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Derive a child seed from a parent seed and a numeric index.
///
/// # Example
///
/// ```
/// use strider_core::seed::derive_seed_indexed;
///
/// assert_ne!(derive_seed_indexed(42, 0), derive_seed_indexed(42, 1));
/// ```
#[must_use]
pub fn derive_seed_indexed(parent: u64, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

/// Independent RNG stream for candidate `index` of a tick.
#[must_use]
pub fn candidate_rng(tick_seed: u64, index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_seed_indexed(tick_seed, index as u64))
}

/// Seed tree rooted at one control session.
///
/// # Example
///
/// ```
/// use strider_core::seed::SeedHierarchy;
///
/// let seeds = SeedHierarchy::new(7);
/// assert_eq!(seeds.tick_seed(3), SeedHierarchy::new(7).tick_seed(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    root: u64,
}

impl SeedHierarchy {
    #[must_use]
    pub const fn new(root: u64) -> Self {
        Self { root }
    }

    /// The root (session-level) seed.
    #[must_use]
    pub const fn root(&self) -> u64 {
        self.root
    }

    /// Seed for a control tick.
    #[must_use]
    pub fn tick_seed(&self, tick: u64) -> u64 {
        derive_seed_indexed(self.root, tick)
    }

    /// Seed for one candidate within a tick.
    #[must_use]
    pub fn candidate_seed(&self, tick: u64, candidate: usize) -> u64 {
        derive_seed_indexed(self.tick_seed(tick), candidate as u64)
    }

    /// Seed for a named subsystem (e.g. the force optimizer's own sampler).
    #[must_use]
    pub fn subsystem_seed(&self, subsystem: &str) -> u64 {
        derive_seed(self.root, subsystem)
    }

    /// RNG handed to the planner at a given tick.
    #[must_use]
    pub fn tick_rng(&self, tick: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.tick_seed(tick))
    }
}

impl Default for SeedHierarchy {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn derive_seed_deterministic() {
        assert_eq!(derive_seed(42, "hello"), derive_seed(42, "hello"));
    }

    #[test]
    fn derive_seed_different_keys() {
        assert_ne!(derive_seed(42, "a"), derive_seed(42, "b"));
    }

    #[test]
    fn derive_seed_indexed_different() {
        assert_ne!(derive_seed_indexed(42, 0), derive_seed_indexed(42, 1));
    }

    #[test]
    fn candidate_streams_are_reproducible() {
        let mut a = candidate_rng(9, 3);
        let mut b = candidate_rng(9, 3);
        let va: u64 = a.r#gen();
        let vb: u64 = b.r#gen();
        assert_eq!(va, vb);
    }

    #[test]
    fn candidate_streams_differ_by_index() {
        let mut a = candidate_rng(9, 0);
        let mut b = candidate_rng(9, 1);
        let va: u64 = a.r#gen();
        let vb: u64 = b.r#gen();
        assert_ne!(va, vb);
    }

    #[test]
    fn hierarchy_candidate_seed_matches_candidate_rng() {
        let h = SeedHierarchy::new(5);
        let tick_seed = h.tick_seed(2);
        let mut from_hierarchy = ChaCha8Rng::seed_from_u64(h.candidate_seed(2, 4));
        let mut direct = candidate_rng(tick_seed, 4);
        let a: u64 = from_hierarchy.r#gen();
        let b: u64 = direct.r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn hierarchy_ticks_differ() {
        let h = SeedHierarchy::new(42);
        assert_ne!(h.tick_seed(0), h.tick_seed(1));
        assert_ne!(h.subsystem_seed("optimizer"), h.subsystem_seed("planner"));
    }

    #[test]
    fn hierarchy_tick_rng_deterministic() {
        let h = SeedHierarchy::new(42);
        let v1: f64 = h.tick_rng(0).r#gen();
        let v2: f64 = h.tick_rng(0).r#gen();
        assert!((v1 - v2).abs() < f64::EPSILON);
    }

    #[test]
    fn hierarchy_default() {
        assert_eq!(SeedHierarchy::default().root(), 0);
    }
}
