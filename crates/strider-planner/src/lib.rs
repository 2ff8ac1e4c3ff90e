//! Per-tick contact schedule selection.
//!
//! [`GaitPlanner`] draws a batch of random schedules from the session's
//! [`GaitAdapter`](strider_gait::GaitAdapter), asks the external
//! [`ForceOptimizer`](strider_core::ForceOptimizer) to score each one, adds a
//! [`StabilityCost`] penalty and keeps the cheapest.
//!
//! Enable the `parallel` feature to evaluate candidates on the rayon thread
//! pool. Results are identical either way.

pub mod sampler;
pub mod stability;

pub use sampler::{BestPlan, CandidateEvaluation, GaitPlanner, select_best};
pub use stability::{StabilityCost, SUPPORT_VIOLATION_WEIGHT, TRANSITION_WEIGHT};
