//! Candidate schedule sampling and selection.
//!
//! Each control tick:
//! 1. draws `num_gait_samples` random schedules, all from the same starting
//!    contact and generator state, each with its own RNG stream
//! 2. optimizes forces for every schedule with the external optimizer
//! 3. scores `optimizer_cost + weight * stability_cost`
//! 4. keeps the cheapest viable candidate (first one wins ties) and commits
//!    its schedule and generator state to the session
//!
//! Steps 1–3 never mutate the session, so candidates can be evaluated in any
//! order (in parallel with the `parallel` feature) and still select the same plan.

use nalgebra::{DVector, Vector3};
use rand::RngCore;
use strider_core::seed::candidate_rng;
use strider_core::{
    ConfigError, ContactSequence, ContactState, ForceOptimizer, GaitError, OptimizerError,
    OptimizerOutput, Params, PlannerConfig, PlanningError, SamplerConfig, StateVector,
    contacts_from_slice,
};
use strider_gait::{GaitAdapter, ScheduleDraw};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::stability::StabilityCost;

/// Outcome of scoring one candidate schedule.
#[derive(Clone, Debug)]
pub struct CandidateEvaluation {
    /// Position in the tick's draw order.
    pub index: usize,
    pub draw: ScheduleDraw,
    pub result: Result<OptimizerOutput, OptimizerError>,
    pub stability_cost: f64,
    /// `+inf` when the optimizer failed or returned a non-finite cost.
    pub total_cost: f64,
}

impl CandidateEvaluation {
    pub fn is_viable(&self) -> bool {
        self.result.is_ok() && self.total_cost.is_finite()
    }

    pub const fn sequence(&self) -> &ContactSequence {
        &self.draw.sequence
    }
}

/// The tick's selected schedule and the optimizer output for it.
#[derive(Clone, Debug, PartialEq)]
pub struct BestPlan {
    pub forces: DVector<f64>,
    pub footholds: Vec<Vector3<f64>>,
    pub predicted_state: StateVector,
    pub params: Params,
    pub optimizer_cost: f64,
    pub frequency: f64,
    pub per_sample_costs: Vec<f64>,
    pub chosen_sequence: ContactSequence,
    pub stability_cost: f64,
    pub total_cost: f64,
    /// Which candidate won.
    pub candidate_index: usize,
}

/// Index of the cheapest viable candidate.
///
/// Strict less-than: among equal costs the earliest candidate wins.
pub fn select_best(evaluations: &[CandidateEvaluation]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, evaluation) in evaluations.iter().enumerate() {
        if !evaluation.is_viable() {
            continue;
        }
        if best.is_none_or(|(_, cost)| evaluation.total_cost < cost) {
            best = Some((i, evaluation.total_cost));
        }
    }
    best.map(|(i, _)| i)
}

/// Per-session gait planner: owns the adapter and the force optimizer.
pub struct GaitPlanner<O> {
    config: SamplerConfig,
    stability: StabilityCost,
    adapter: GaitAdapter,
    optimizer: O,
    best_sequence: Option<ContactSequence>,
    ticks: u64,
}

impl<O: ForceOptimizer> GaitPlanner<O> {
    /// Create a planner for one control session.
    pub fn new(config: &PlannerConfig, optimizer: O) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_adapter(config.sampler, GaitAdapter::from_config(config), optimizer)
    }

    /// Create a planner around an existing adapter.
    pub fn with_adapter(
        config: SamplerConfig,
        adapter: GaitAdapter,
        optimizer: O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stability: StabilityCost::new(config.min_support_legs),
            adapter,
            optimizer,
            best_sequence: None,
            ticks: 0,
        })
    }

    /// Plan one control tick.
    ///
    /// `current_contacts` overrides the session's carried contact state as the
    /// starting point of every candidate. On success the winning schedule is
    /// committed; on failure the session is left untouched.
    pub fn plan<R: RngCore + ?Sized>(
        &mut self,
        state: &StateVector,
        reference: &StateVector,
        current_contacts: Option<&[bool]>,
        warm_start: &Params,
        rng: &mut R,
    ) -> Result<BestPlan, PlanningError> {
        let start = match current_contacts {
            Some(contacts) => contacts_from_slice(contacts)?,
            None => self.adapter.current_contact(),
        };
        let tick_seed = rng.next_u64();
        let mut evaluations =
            self.evaluate_candidates_from(start, state, reference, warm_start, tick_seed)?;

        let Some(winner) = select_best(&evaluations) else {
            warn!(
                tick = self.ticks,
                candidates = evaluations.len(),
                "no viable candidate schedule"
            );
            return Err(PlanningError::PlanningFailed {
                candidates: evaluations.len(),
            });
        };
        let viable = evaluations.iter().filter(|e| e.is_viable()).count();
        let candidates = evaluations.len();
        let CandidateEvaluation {
            index,
            draw,
            result,
            stability_cost,
            total_cost,
        } = evaluations.swap_remove(winner);
        let Ok(output) = result else {
            return Err(PlanningError::PlanningFailed { candidates });
        };

        debug!(
            tick = self.ticks,
            winner = index,
            viable,
            candidates,
            total_cost,
            stability_cost,
            "selected contact schedule"
        );

        let chosen_sequence = draw.sequence.clone();
        self.adapter.commit(draw);
        self.best_sequence = Some(chosen_sequence.clone());
        self.ticks += 1;

        Ok(BestPlan {
            forces: output.forces,
            footholds: output.footholds,
            predicted_state: output.predicted_state,
            params: output.params,
            optimizer_cost: output.cost,
            frequency: output.frequency,
            per_sample_costs: output.per_sample_costs,
            chosen_sequence,
            stability_cost,
            total_cost,
            candidate_index: index,
        })
    }

    /// Draw and score every candidate for a tick seed without committing anything.
    pub fn evaluate_candidates(
        &self,
        state: &StateVector,
        reference: &StateVector,
        warm_start: &Params,
        tick_seed: u64,
    ) -> Result<Vec<CandidateEvaluation>, GaitError> {
        self.evaluate_candidates_from(
            self.adapter.current_contact(),
            state,
            reference,
            warm_start,
            tick_seed,
        )
    }

    fn evaluate_candidates_from(
        &self,
        start: ContactState,
        state: &StateVector,
        reference: &StateVector,
        warm_start: &Params,
        tick_seed: u64,
    ) -> Result<Vec<CandidateEvaluation>, GaitError> {
        let n = self.config.num_gait_samples;

        #[cfg(feature = "parallel")]
        let evaluations = (0..n)
            .into_par_iter()
            .map(|i| self.evaluate_candidate(i, start, state, reference, warm_start, tick_seed))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let evaluations = (0..n)
            .map(|i| self.evaluate_candidate(i, start, state, reference, warm_start, tick_seed))
            .collect();

        evaluations
    }

    fn evaluate_candidate(
        &self,
        index: usize,
        start: ContactState,
        state: &StateVector,
        reference: &StateVector,
        warm_start: &Params,
        tick_seed: u64,
    ) -> Result<CandidateEvaluation, GaitError> {
        let mut rng = candidate_rng(tick_seed, index);
        let draw = self.adapter.sample_candidate_from(start, &mut rng)?;
        let stability_cost = self.stability.evaluate(&draw.sequence);

        let result = self
            .optimizer
            .optimize(state, reference, &draw.sequence, warm_start, &mut rng)
            .and_then(|output| {
                if output.cost.is_finite() {
                    Ok(output)
                } else {
                    Err(OptimizerError::InvalidCost(output.cost))
                }
            });

        let total_cost = match &result {
            Ok(output) => output.cost + self.config.gait_stability_weight * stability_cost,
            Err(err) => {
                warn!(candidate = index, optimizer = self.optimizer.name(), %err, "candidate excluded");
                f64::INFINITY
            }
        };

        Ok(CandidateEvaluation {
            index,
            draw,
            result,
            stability_cost,
            total_cost,
        })
    }

    /// Reset the session: both generators at rest, no previous plan.
    pub fn reset(&mut self) {
        self.adapter.reset();
        self.best_sequence = None;
        self.ticks = 0;
    }

    /// Schedule chosen on the last successful tick.
    pub const fn best_sequence(&self) -> Option<&ContactSequence> {
        self.best_sequence.as_ref()
    }

    /// Contact state that seeds the next tick.
    pub const fn current_contact(&self) -> ContactState {
        self.adapter.current_contact()
    }

    /// Number of successfully planned ticks since construction or reset.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub const fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub const fn adapter(&self) -> &GaitAdapter {
        &self.adapter
    }

    pub const fn adapter_mut(&mut self) -> &mut GaitAdapter {
        &mut self.adapter
    }

    pub const fn optimizer(&self) -> &O {
        &self.optimizer
    }
}
