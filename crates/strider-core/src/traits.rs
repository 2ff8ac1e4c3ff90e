use nalgebra::{DVector, Vector3};
use rand::RngCore;

use crate::error::OptimizerError;
use crate::types::ContactSequence;

/// Stacked robot state (or reference trajectory) handed to the optimizer.
pub type StateVector = DVector<f64>;

/// Optimizer parameter vector, used as warm start on the next tick.
pub type Params = DVector<f64>;

// ---------------------------------------------------------------------------
// ForceOptimizer
// ---------------------------------------------------------------------------

/// Everything the force optimizer produces for one contact schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizerOutput {
    /// Ground reaction force trajectory over the horizon (3 per foot per step).
    pub forces: DVector<f64>,
    /// Planned landing position per foot.
    pub footholds: Vec<Vector3<f64>>,
    /// Predicted state trajectory.
    pub predicted_state: StateVector,
    /// Optimized parameters.
    pub params: Params,
    /// Scalar cost of the optimized trajectory.
    pub cost: f64,
    /// Step frequency the optimizer settled on.
    pub frequency: f64,
    /// Cost of every internal rollout sample.
    pub per_sample_costs: Vec<f64>,
}

/// Continuous force/foothold optimizer that consumes a contact schedule.
///
/// Must be deterministic for identical inputs and RNG state, and safe to call
/// concurrently with distinct inputs.
pub trait ForceOptimizer: Send + Sync {
    /// Optimize forces and footholds for `sequence`.
    fn optimize(
        &self,
        state: &StateVector,
        reference: &StateVector,
        sequence: &ContactSequence,
        warm_start: &Params,
        rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError>;

    /// Human-readable name for this optimizer.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<T: ForceOptimizer + ?Sized> ForceOptimizer for Box<T> {
    fn optimize(
        &self,
        state: &StateVector,
        reference: &StateVector,
        sequence: &ContactSequence,
        warm_start: &Params,
        rng: &mut dyn RngCore,
    ) -> Result<OptimizerOutput, OptimizerError> {
        (**self).optimize(state, reference, sequence, warm_start, rng)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
