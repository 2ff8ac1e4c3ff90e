//! Shared test fixtures and utilities for strider crates.
//!
//! Provides deterministic and scripted RNGs plus stub force optimizers.

pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use mocks::{
    ConstantCostOptimizer, FailingOptimizer, NanCostOptimizer, StanceOnlyOptimizer,
    SwingCostOptimizer, stub_output, swing_cells,
};
pub use rng::{always_exit_rng, never_exit_rng, seeded_rng};
