//! Stub force optimizers for testing the planner.
//!
//! Each stub returns well-formed [`OptimizerOutput`]s whose cost depends only
//! on the contact sequence, so selection outcomes are predictable.

use nalgebra::{DVector, Vector3};
use rand::RngCore;
use strider_core::{
    ContactSequence, ForceOptimizer, LEG_COUNT, OptimizerError, OptimizerOutput, Params,
    StateVector,
};

/// Well-formed output of the right shape for `sequence`.
pub fn stub_output(sequence: &ContactSequence, warm_start: &Params, cost: f64) -> OptimizerOutput {
    let horizon = sequence.horizon();
    OptimizerOutput {
        forces: DVector::zeros(3 * LEG_COUNT * horizon),
        footholds: vec![Vector3::zeros(); LEG_COUNT],
        predicted_state: DVector::zeros(horizon),
        params: warm_start.clone(),
        cost,
        frequency: 1.4,
        per_sample_costs: vec![cost],
    }
}

/// Number of swing cells in a sequence.
pub fn swing_cells(sequence: &ContactSequence) -> usize {
    sequence
        .columns()
        .map(|col| col.iter().filter(|&&c| !c).count())
        .sum()
}

// ---------------------------------------------------------------------------
// ConstantCostOptimizer
// ---------------------------------------------------------------------------

/// Returns the same cost for every schedule.
pub struct ConstantCostOptimizer {
    cost: f64,
}

impl ConstantCostOptimizer {
    pub const fn new(cost: f64) -> Self {
        Self { cost }
    }

    /// Optimizer that considers every schedule free.
    pub const fn zero() -> Self {
        Self { cost: 0.0 }
    }
}

impl ForceOptimizer for ConstantCostOptimizer {
    fn optimize(
        &self,
        _state: &StateVector,
        _reference: &StateVector,
        sequence: &ContactSequence,
        warm_start: &Params,
        _rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError> {
        Ok(stub_output(sequence, warm_start, self.cost))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ConstantCostOptimizer"
    }
}

// ---------------------------------------------------------------------------
// SwingCostOptimizer
// ---------------------------------------------------------------------------

/// Charges `per_swing` for every swing cell, so fuller stance is cheaper.
pub struct SwingCostOptimizer {
    per_swing: f64,
}

impl SwingCostOptimizer {
    pub const fn new(per_swing: f64) -> Self {
        Self { per_swing }
    }
}

impl ForceOptimizer for SwingCostOptimizer {
    fn optimize(
        &self,
        _state: &StateVector,
        _reference: &StateVector,
        sequence: &ContactSequence,
        warm_start: &Params,
        _rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError> {
        let cost = self.per_swing * swing_cells(sequence) as f64;
        Ok(stub_output(sequence, warm_start, cost))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "SwingCostOptimizer"
    }
}

// ---------------------------------------------------------------------------
// FailingOptimizer / NanCostOptimizer
// ---------------------------------------------------------------------------

/// Never converges.
pub struct FailingOptimizer;

impl ForceOptimizer for FailingOptimizer {
    fn optimize(
        &self,
        _state: &StateVector,
        _reference: &StateVector,
        _sequence: &ContactSequence,
        _warm_start: &Params,
        _rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError> {
        Err(OptimizerError::NonConvergence("stub".into()))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "FailingOptimizer"
    }
}

/// Reports success but with a NaN cost.
pub struct NanCostOptimizer;

impl ForceOptimizer for NanCostOptimizer {
    fn optimize(
        &self,
        _state: &StateVector,
        _reference: &StateVector,
        sequence: &ContactSequence,
        warm_start: &Params,
        _rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError> {
        Ok(stub_output(sequence, warm_start, f64::NAN))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "NanCostOptimizer"
    }
}

// ---------------------------------------------------------------------------
// StanceOnlyOptimizer
// ---------------------------------------------------------------------------

/// Fails on any schedule that lifts a foot; full stance costs `cost`.
pub struct StanceOnlyOptimizer {
    cost: f64,
}

impl StanceOnlyOptimizer {
    pub const fn new(cost: f64) -> Self {
        Self { cost }
    }
}

impl ForceOptimizer for StanceOnlyOptimizer {
    fn optimize(
        &self,
        _state: &StateVector,
        _reference: &StateVector,
        sequence: &ContactSequence,
        warm_start: &Params,
        _rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError> {
        if swing_cells(sequence) > 0 {
            return Err(OptimizerError::Failed("swing not supported".into()));
        }
        Ok(stub_output(sequence, warm_start, self.cost))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "StanceOnlyOptimizer"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;

    fn inputs() -> (StateVector, StateVector, Params) {
        (DVector::zeros(12), DVector::zeros(12), DVector::zeros(3))
    }

    fn one_swing() -> ContactSequence {
        ContactSequence::from_rows([
            vec![true, false],
            vec![true, true],
            vec![true, true],
            vec![true, true],
        ])
        .unwrap()
    }

    #[test]
    fn stub_output_shapes() {
        let seq = ContactSequence::full_stance(5);
        let out = stub_output(&seq, &DVector::zeros(2), 1.5);
        assert_eq!(out.forces.len(), 60);
        assert_eq!(out.footholds.len(), 4);
        assert_eq!(out.params.len(), 2);
        assert_eq!(out.per_sample_costs, vec![1.5]);
    }

    #[test]
    fn constant_cost_ignores_sequence() {
        let (s, r, w) = inputs();
        let out = ConstantCostOptimizer::new(3.0)
            .optimize(&s, &r, &one_swing(), &w, &mut seeded_rng(0))
            .unwrap();
        assert!((out.cost - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn swing_cost_counts_cells() {
        let (s, r, w) = inputs();
        let out = SwingCostOptimizer::new(2.0)
            .optimize(&s, &r, &one_swing(), &w, &mut seeded_rng(0))
            .unwrap();
        assert!((out.cost - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failing_and_nan_optimizers() {
        let (s, r, w) = inputs();
        let seq = ContactSequence::full_stance(3);
        assert!(FailingOptimizer.optimize(&s, &r, &seq, &w, &mut seeded_rng(0)).is_err());
        let out = NanCostOptimizer
            .optimize(&s, &r, &seq, &w, &mut seeded_rng(0))
            .unwrap();
        assert!(out.cost.is_nan());
    }

    #[test]
    fn stance_only_rejects_swing() {
        let (s, r, w) = inputs();
        let opt = StanceOnlyOptimizer::new(1.0);
        assert!(opt.optimize(&s, &r, &one_swing(), &w, &mut seeded_rng(0)).is_err());
        assert!(
            opt.optimize(&s, &r, &ContactSequence::full_stance(2), &w, &mut seeded_rng(0))
                .is_ok()
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn mock_types_are_send_sync() {
        assert_send_sync::<ConstantCostOptimizer>();
        assert_send_sync::<SwingCostOptimizer>();
        assert_send_sync::<FailingOptimizer>();
        assert_send_sync::<NanCostOptimizer>();
        assert_send_sync::<StanceOnlyOptimizer>();
    }
}
