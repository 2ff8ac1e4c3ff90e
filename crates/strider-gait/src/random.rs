//! Random but feasible per-leg contact schedules.
//!
//! Each leg runs a two-state (stance/swing) machine advanced once per
//! simulated step:
//! - Stance exits to swing with probability [`STANCE_EXIT_PROBABILITY`] per
//!   step once the minimum stance duration has elapsed and the diagonal
//!   partner is not swinging (when diagonal coordination is enforced).
//! - Swing returns to stance as soon as the minimum swing duration has
//!   elapsed.
//!
//! The maximum durations in [`GaitParameters`] are not enforced by these
//! rules. They are only used to report infeasible configurations.

use rand::Rng;
use strider_core::{
    ContactSequence, ContactState, GaitError, GaitParameters, LEG_COUNT, LEG_PROCESSING_ORDER,
    Leg, LegState,
};

/// Per-step probability that an eligible stance leg lifts off.
pub const STANCE_EXIT_PROBABILITY: f64 = 0.3;

/// Absorbs decimal representation error before flooring (0.3 / 0.02 = 14.999...).
const STEP_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// StepBounds
// ---------------------------------------------------------------------------

/// Duration bounds converted to whole steps for one sampling timestep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepBounds {
    pub min_stance: u32,
    pub max_stance: u32,
    pub min_swing: u32,
    pub max_swing: u32,
}

impl StepBounds {
    /// Floor-divide every duration bound by `dt`.
    pub fn new(params: &GaitParameters, dt: f64) -> Result<Self, GaitError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(GaitError::InvalidTimestep(dt));
        }
        Ok(Self {
            min_stance: duration_to_steps(params.min_stance_duration, dt),
            max_stance: duration_to_steps(params.max_stance_duration, dt),
            min_swing: duration_to_steps(params.min_swing_duration, dt),
            max_swing: duration_to_steps(params.max_swing_duration, dt),
        })
    }

    /// Err when a minimum exceeds its maximum after flooring.
    pub const fn check(&self) -> Result<(), GaitError> {
        if self.min_stance > self.max_stance {
            return Err(GaitError::InfeasibleScheduleBounds {
                phase: LegState::Stance,
                min_steps: self.min_stance,
                max_steps: self.max_stance,
            });
        }
        if self.min_swing > self.max_swing {
            return Err(GaitError::InfeasibleScheduleBounds {
                phase: LegState::Swing,
                min_steps: self.min_swing,
                max_steps: self.max_swing,
            });
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration_to_steps(duration: f64, dt: f64) -> u32 {
    (duration / dt + STEP_EPSILON).floor().max(0.0) as u32
}

// ---------------------------------------------------------------------------
// GeneratorState
// ---------------------------------------------------------------------------

/// Mutable state of the leg state machines.
///
/// `Copy`, so a tick can hand every candidate its own snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GeneratorState {
    pub leg_states: [LegState; LEG_COUNT],
    /// Steps spent in the current state.
    pub leg_timers: [u32; LEG_COUNT],
}

impl GeneratorState {
    /// Contact flags of the current leg states.
    pub fn contacts(&self) -> ContactState {
        self.leg_states.map(LegState::is_stance)
    }

    /// Overwrite leg states, keeping timers.
    pub fn set_contacts(&mut self, contacts: ContactState) {
        self.leg_states = contacts.map(LegState::from_contact);
    }

    /// Whether `leg` may lift off given the in-progress states of this step.
    pub const fn can_start_swing(&self, leg: Leg, enforce_diagonal_coordination: bool) -> bool {
        !enforce_diagonal_coordination || !self.leg_states[leg.diagonal().index()].is_swing()
    }

    fn step_leg<R: Rng + ?Sized>(
        &mut self,
        leg: Leg,
        params: &GaitParameters,
        bounds: &StepBounds,
        rng: &mut R,
    ) {
        let i = leg.index();
        match self.leg_states[i] {
            LegState::Stance => {
                if self.leg_timers[i] >= bounds.min_stance
                    && self.can_start_swing(leg, params.enforce_diagonal_coordination)
                    && rng.r#gen::<f64>() < STANCE_EXIT_PROBABILITY
                {
                    self.leg_states[i] = LegState::Swing;
                    self.leg_timers[i] = 0;
                }
            }
            LegState::Swing => {
                if self.leg_timers[i] >= bounds.min_swing {
                    self.leg_states[i] = LegState::Stance;
                    self.leg_timers[i] = 0;
                }
            }
        }
    }

    /// Run the state machines for `horizon` steps and record every step.
    ///
    /// With `hold_first` the first column records the entry state unchanged.
    fn roll_out<R: Rng + ?Sized>(
        &mut self,
        horizon: usize,
        params: &GaitParameters,
        bounds: &StepBounds,
        hold_first: bool,
        rng: &mut R,
    ) -> Result<ContactSequence, GaitError> {
        let mut rows: [Vec<bool>; LEG_COUNT] = std::array::from_fn(|_| Vec::with_capacity(horizon));
        for t in 0..horizon {
            for leg in LEG_PROCESSING_ORDER {
                if !(hold_first && t == 0) {
                    self.step_leg(leg, params, bounds, rng);
                }
                let i = leg.index();
                self.leg_timers[i] = self.leg_timers[i].saturating_add(1);
                rows[i].push(self.leg_states[i].is_stance());
            }
        }
        ContactSequence::from_rows(rows)
    }
}

// ---------------------------------------------------------------------------
// RandomGaitGenerator
// ---------------------------------------------------------------------------

/// Generates random but feasible gait patterns.
#[derive(Clone, Debug)]
pub struct RandomGaitGenerator {
    params: GaitParameters,
    state: GeneratorState,
    previous_sequence: Option<ContactSequence>,
}

impl RandomGaitGenerator {
    /// Create a generator with all legs in stance and zeroed timers.
    pub fn new(params: GaitParameters) -> Self {
        Self {
            params,
            state: GeneratorState::default(),
            previous_sequence: None,
        }
    }

    /// Generate a contact sequence and advance the generator state.
    ///
    /// `current_contacts` overwrites the leg states (timers carry over) and is
    /// recorded verbatim as column 0.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        horizon: usize,
        dt: f64,
        current_contacts: Option<ContactState>,
        rng: &mut R,
    ) -> Result<ContactSequence, GaitError> {
        let (sequence, state) = self.sample(horizon, dt, current_contacts, rng)?;
        self.state = state;
        self.previous_sequence = Some(sequence.clone());
        Ok(sequence)
    }

    /// Like [`generate`](Self::generate) but on a copy of the state.
    ///
    /// Returns the sequence together with the state the generator would be in
    /// afterwards; `self` is left untouched.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        horizon: usize,
        dt: f64,
        current_contacts: Option<ContactState>,
        rng: &mut R,
    ) -> Result<(ContactSequence, GeneratorState), GaitError> {
        let bounds = StepBounds::new(&self.params, dt)?;
        let mut state = self.state;
        if let Some(contacts) = current_contacts {
            state.set_contacts(contacts);
        }
        let sequence =
            state.roll_out(horizon, &self.params, &bounds, current_contacts.is_some(), rng)?;
        Ok((sequence, state))
    }

    /// Adopt a state produced by [`sample`](Self::sample).
    pub fn commit(&mut self, state: GeneratorState, sequence: ContactSequence) {
        self.state = state;
        self.previous_sequence = Some(sequence);
    }

    /// All legs in stance, timers zeroed, cached sequence cleared.
    pub fn reset(&mut self) {
        self.state = GeneratorState::default();
        self.previous_sequence = None;
    }

    pub const fn params(&self) -> &GaitParameters {
        &self.params
    }

    pub const fn state(&self) -> &GeneratorState {
        &self.state
    }

    pub const fn set_state(&mut self, state: GeneratorState) {
        self.state = state;
    }

    /// Overwrite leg states without touching timers.
    pub fn set_leg_states(&mut self, contacts: ContactState) {
        self.state.set_contacts(contacts);
    }

    /// Sequence produced by the last committed generation.
    pub const fn previous_sequence(&self) -> Option<&ContactSequence> {
        self.previous_sequence.as_ref()
    }

    /// Step bounds for a sampling timestep.
    pub fn step_bounds(&self, dt: f64) -> Result<StepBounds, GaitError> {
        StepBounds::new(&self.params, dt)
    }
}

impl Default for RandomGaitGenerator {
    fn default() -> Self {
        Self::new(GaitParameters::default())
    }
}
