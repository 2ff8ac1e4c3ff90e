//! Stability penalty for candidate contact schedules.
//!
//! Two terms, both unclipped:
//! - support violation: `1000 * (min_support_legs - stance_count)` for every
//!   step with fewer stance legs than the floor
//! - chattering: `10` per leg that changes contact between adjacent steps

use strider_core::{ContactSequence, LEG_COUNT};

/// Cost per missing support leg per step.
pub const SUPPORT_VIOLATION_WEIGHT: f64 = 1000.0;

/// Cost per leg transition between adjacent steps.
pub const TRANSITION_WEIGHT: f64 = 10.0;

/// Scores how well a contact schedule supports the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StabilityCost {
    min_support_legs: usize,
}

impl StabilityCost {
    pub fn new(min_support_legs: usize) -> Self {
        Self {
            min_support_legs: min_support_legs.min(LEG_COUNT),
        }
    }

    pub const fn min_support_legs(&self) -> usize {
        self.min_support_legs
    }

    /// Total stability cost (lower is better).
    pub fn evaluate(&self, sequence: &ContactSequence) -> f64 {
        self.support_violation(sequence) + Self::chattering(sequence)
    }

    /// Penalty for steps below the support floor.
    pub fn support_violation(&self, sequence: &ContactSequence) -> f64 {
        let missing: usize = (0..sequence.horizon())
            .map(|t| self.min_support_legs.saturating_sub(sequence.stance_count(t)))
            .sum();
        SUPPORT_VIOLATION_WEIGHT * missing as f64
    }

    /// Penalty for stance/swing flips between adjacent steps.
    pub fn chattering(sequence: &ContactSequence) -> f64 {
        let flips: usize = (1..sequence.horizon()).map(|t| sequence.transitions(t)).sum();
        TRANSITION_WEIGHT * flips as f64
    }
}
