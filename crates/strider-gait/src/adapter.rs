//! One interface over the random and periodic gait generators.
//!
//! The adapter owns both generators for the lifetime of a control session and
//! keeps the session's current contact state, which seeds every random draw.

use rand::Rng;
use strider_core::{
    ContactSequence, ContactState, FULL_STANCE, GaitError, GaitParameters, PeriodicConfig,
    PlannerConfig, contacts_from_slice,
};
use tracing::{debug, warn};

use crate::periodic::{PeriodicGaitGenerator, StartStopInput, TimingSegment};
use crate::random::{GeneratorState, RandomGaitGenerator};

/// Sampling timestep used when the step frequency is not positive.
pub const FALLBACK_SAMPLING_DT: f64 = 0.02;

/// Default periodic timestep when no timing segments are given.
pub const DEFAULT_PERIODIC_DT: f64 = 0.02;

/// Random-mode samples per gait cycle.
const SAMPLES_PER_CYCLE: f64 = 10.0;

/// Which generator drives the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaitMode {
    Random,
    Periodic,
}

/// A random schedule drawn without touching the adapter.
///
/// Hand it back to [`GaitAdapter::commit`] to make it the session's schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleDraw {
    pub sequence: ContactSequence,
    /// Generator state after producing `sequence`.
    pub state: GeneratorState,
}

/// Gait adapter switching between random and periodic schedules.
#[derive(Clone, Debug)]
pub struct GaitAdapter {
    mode: GaitMode,
    horizon: usize,
    step_freq: f64,
    periodic: PeriodicGaitGenerator,
    random: RandomGaitGenerator,
    current_contact: ContactState,
}

impl GaitAdapter {
    /// Create an adapter with both generators at rest.
    ///
    /// `random_params` defaults to bounds derived from the periodic gait.
    pub fn new(
        periodic: PeriodicConfig,
        horizon: usize,
        use_random_gait: bool,
        random_params: Option<GaitParameters>,
    ) -> Self {
        let params = random_params
            .unwrap_or_else(|| GaitParameters::from_periodic(periodic.duty_factor, periodic.step_freq));
        let adapter = Self {
            mode: if use_random_gait {
                GaitMode::Random
            } else {
                GaitMode::Periodic
            },
            horizon,
            step_freq: periodic.step_freq,
            periodic: PeriodicGaitGenerator::new(periodic),
            random: RandomGaitGenerator::new(params),
            current_contact: FULL_STANCE,
        };
        adapter.warn_infeasible_bounds();
        adapter
    }

    /// Create an adapter from a planner configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            config.periodic,
            config.horizon,
            config.use_random_gait,
            Some(config.gait_parameters()),
        )
    }

    fn warn_infeasible_bounds(&self) {
        let checked = self
            .random
            .step_bounds(self.sampling_dt())
            .and_then(|bounds| bounds.check());
        if let Err(err) = checked {
            warn!(dt = self.sampling_dt(), %err, "random gait bounds are infeasible");
        }
    }

    /// Timestep used for random-mode sampling: a tenth of a gait cycle.
    pub fn sampling_dt(&self) -> f64 {
        if self.step_freq > 0.0 {
            1.0 / (SAMPLES_PER_CYCLE * self.step_freq)
        } else {
            FALLBACK_SAMPLING_DT
        }
    }

    /// Generate the schedule for this tick with the active generator.
    ///
    /// In random mode the draw is committed immediately and column 0 becomes
    /// the new current contact. In periodic mode `timing` defaults to one
    /// segment of [`DEFAULT_PERIODIC_DT`] over the whole horizon.
    pub fn compute_contact_sequence<R: Rng + ?Sized>(
        &mut self,
        timing: Option<&[TimingSegment]>,
        rng: &mut R,
    ) -> Result<ContactSequence, GaitError> {
        match self.mode {
            GaitMode::Random => {
                let draw = self.sample_candidate(rng)?;
                let sequence = draw.sequence.clone();
                self.commit(draw);
                Ok(sequence)
            }
            GaitMode::Periodic => match timing {
                Some(segments) => self.periodic.compute_contact_sequence(segments),
                None => self
                    .periodic
                    .compute_contact_sequence(&[TimingSegment::new(DEFAULT_PERIODIC_DT, self.horizon)]),
            },
        }
    }

    /// Draw a random schedule from the current contact without changing any state.
    pub fn sample_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ScheduleDraw, GaitError> {
        self.sample_candidate_from(self.current_contact, rng)
    }

    /// Draw a random schedule starting from `contacts` instead of the current contact.
    pub fn sample_candidate_from<R: Rng + ?Sized>(
        &self,
        contacts: ContactState,
        rng: &mut R,
    ) -> Result<ScheduleDraw, GaitError> {
        let (sequence, state) =
            self.random
                .sample(self.horizon, self.sampling_dt(), Some(contacts), rng)?;
        Ok(ScheduleDraw { sequence, state })
    }

    /// Adopt a draw: generator state advances and column 0 becomes the current contact.
    pub fn commit(&mut self, draw: ScheduleDraw) {
        if let Some(first) = draw.sequence.first() {
            self.current_contact = first;
        }
        self.random.commit(draw.state, draw.sequence);
    }

    /// Advance by `dt` seconds and return the instantaneous contact state.
    ///
    /// Random mode synthesizes a one-step schedule from the current contact,
    /// letting legs transition on that step. Periodic mode integrates the gait phase.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        step_freq: f64,
        rng: &mut R,
    ) -> Result<ContactState, GaitError> {
        match self.mode {
            GaitMode::Random => {
                self.step_freq = step_freq;
                self.random.set_leg_states(self.current_contact);
                let sequence = self.random.generate(1, dt, None, rng)?;
                if let Some(contacts) = sequence.first() {
                    self.current_contact = contacts;
                }
                Ok(self.current_contact)
            }
            GaitMode::Periodic => {
                self.step_freq = step_freq;
                self.periodic.run(dt, step_freq)
            }
        }
    }

    /// Reset both generators and return to full stance.
    pub fn reset(&mut self) {
        self.periodic.reset();
        self.random.reset();
        self.current_contact = FULL_STANCE;
    }

    /// Force every foot to the ground.
    pub fn set_full_stance(&mut self) {
        self.periodic.set_full_stance();
        self.random.reset();
        self.current_contact = FULL_STANCE;
    }

    /// Resume the periodic gait active before the last full-stance override.
    pub fn restore_previous_gait(&mut self) {
        self.periodic.restore_previous_gait();
    }

    /// Start/stop handling; only the periodic generator reacts.
    pub fn update_start_and_stop(&mut self, input: &StartStopInput) {
        if self.mode == GaitMode::Periodic {
            self.periodic.update_start_and_stop(input);
        }
    }

    /// Switch generator. Both generators are reset, so continuity is broken.
    pub fn set_gait_mode(&mut self, use_random: bool) {
        self.mode = if use_random {
            GaitMode::Random
        } else {
            GaitMode::Periodic
        };
        debug!(mode = ?self.mode, "gait mode switched");
        self.reset();
    }

    pub const fn mode(&self) -> GaitMode {
        self.mode
    }

    pub const fn current_contact(&self) -> ContactState {
        self.current_contact
    }

    /// Seed the next draw from an observed contact state.
    pub fn set_current_contact(&mut self, contacts: &[bool]) -> Result<(), GaitError> {
        self.current_contact = contacts_from_slice(contacts)?;
        Ok(())
    }

    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    pub const fn step_freq(&self) -> f64 {
        self.step_freq
    }

    pub const fn random_generator(&self) -> &RandomGaitGenerator {
        &self.random
    }

    pub const fn periodic_generator(&self) -> &PeriodicGaitGenerator {
        &self.periodic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strider_core::GaitType;
    use strider_test_utils::{always_exit_rng, never_exit_rng, seeded_rng};

    fn trot() -> PeriodicConfig {
        PeriodicConfig {
            gait: GaitType::Trot,
            duty_factor: 0.6,
            step_freq: 2.0,
        }
    }

    fn fast_params() -> GaitParameters {
        // at dt 0.05: min stance 1 step, min swing 2 steps
        GaitParameters {
            min_stance_duration: 0.05,
            max_stance_duration: 0.5,
            min_swing_duration: 0.1,
            max_swing_duration: 0.5,
            enforce_diagonal_coordination: true,
        }
    }

    #[test]
    fn initialization() {
        let adapter = GaitAdapter::new(trot(), 20, false, None);
        assert_eq!(adapter.mode(), GaitMode::Periodic);
        assert_eq!(adapter.horizon(), 20);
        assert_relative_eq!(adapter.step_freq(), 2.0);
        assert_eq!(adapter.current_contact(), FULL_STANCE);
        assert!(adapter.random_generator().params().enforce_diagonal_coordination);

        let random = GaitAdapter::new(trot(), 20, true, None);
        assert_eq!(random.mode(), GaitMode::Random);
    }

    #[test]
    fn sampling_dt_from_step_freq() {
        let adapter = GaitAdapter::new(trot(), 20, true, None);
        assert_relative_eq!(adapter.sampling_dt(), 0.05);

        let stopped = GaitAdapter::new(
            PeriodicConfig {
                step_freq: 0.0,
                ..trot()
            },
            20,
            true,
            None,
        );
        assert_relative_eq!(stopped.sampling_dt(), FALLBACK_SAMPLING_DT);
    }

    #[test]
    fn periodic_mode_trot() {
        let mut adapter = GaitAdapter::new(trot(), 20, false, None);
        let seq = adapter
            .compute_contact_sequence(Some(&[TimingSegment::new(0.02, 20)]), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(seq.horizon(), 20);
        assert_eq!(seq.to_steps().len(), 20);
        for col in seq.columns() {
            assert_eq!(col[0], col[3]);
            assert_eq!(col[1], col[2]);
        }
    }

    #[test]
    fn periodic_mode_default_timing() {
        let mut adapter = GaitAdapter::new(trot(), 20, false, None);
        let explicit = adapter
            .compute_contact_sequence(Some(&[TimingSegment::new(0.02, 20)]), &mut seeded_rng(0))
            .unwrap();
        let default = adapter.compute_contact_sequence(None, &mut seeded_rng(0)).unwrap();
        assert_eq!(explicit, default);
    }

    #[test]
    fn random_mode_shape_and_continuity() {
        let mut adapter = GaitAdapter::new(trot(), 20, true, Some(fast_params()));
        adapter.set_current_contact(&[true, false, true, true]).unwrap();
        let seq = adapter.compute_contact_sequence(None, &mut seeded_rng(1)).unwrap();
        assert_eq!(seq.horizon(), 20);
        assert_eq!(seq.column(0), [true, false, true, true]);
        assert_eq!(adapter.current_contact(), seq.column(0));
        assert_eq!(adapter.random_generator().previous_sequence(), Some(&seq));
    }

    #[test]
    fn sample_candidate_is_side_effect_free() {
        let adapter = GaitAdapter::new(trot(), 12, true, Some(fast_params()));
        let before_state = *adapter.random_generator().state();
        let a = adapter.sample_candidate(&mut seeded_rng(3)).unwrap();
        let b = adapter.sample_candidate(&mut seeded_rng(3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(adapter.random_generator().state(), &before_state);
        assert_eq!(adapter.current_contact(), FULL_STANCE);
    }

    #[test]
    fn commit_advances_state() {
        let mut adapter = GaitAdapter::new(trot(), 12, true, Some(fast_params()));
        adapter.set_current_contact(&[true, true, false, true]).unwrap();
        let draw = adapter.sample_candidate(&mut always_exit_rng()).unwrap();
        let expected_state = draw.state;
        let expected_sequence = draw.sequence.clone();
        adapter.commit(draw);
        assert_ne!(expected_state, GeneratorState::default());
        assert_eq!(adapter.random_generator().state(), &expected_state);
        assert_eq!(adapter.current_contact(), [true, true, false, true]);
        assert_eq!(
            adapter.random_generator().previous_sequence(),
            Some(&expected_sequence)
        );
    }

    #[test]
    fn rejects_wrong_contact_length() {
        let mut adapter = GaitAdapter::new(trot(), 12, true, None);
        let err = adapter.set_current_contact(&[true, true]).unwrap_err();
        assert_eq!(err, GaitError::ShapeMismatch { expected: 4, got: 2 });
        assert_eq!(adapter.current_contact(), FULL_STANCE);
    }

    #[test]
    fn run_random_mode_transitions() {
        let mut adapter = GaitAdapter::new(trot(), 12, true, Some(fast_params()));
        // min stance at dt 0.05 is one step: first run only ages the timers
        let first = adapter.run(0.05, 2.0, &mut always_exit_rng()).unwrap();
        assert_eq!(first, FULL_STANCE);
        // FL and FR lift; RL and RR are vetoed by their diagonal partners
        let second = adapter.run(0.05, 2.0, &mut always_exit_rng()).unwrap();
        assert_eq!(second, [false, false, true, true]);
        assert_eq!(adapter.current_contact(), second);
    }

    #[test]
    fn run_random_mode_rejects_bad_dt() {
        let mut adapter = GaitAdapter::new(trot(), 12, true, None);
        let err = adapter.run(0.0, 2.0, &mut never_exit_rng()).unwrap_err();
        assert_eq!(err, GaitError::InvalidTimestep(0.0));
    }

    #[test]
    fn run_periodic_mode() {
        let mut adapter = GaitAdapter::new(trot(), 20, false, None);
        let contacts = adapter.run(0.01, 2.0, &mut seeded_rng(0)).unwrap();
        assert_eq!(contacts, adapter.periodic_generator().contacts());
        assert_relative_eq!(adapter.periodic_generator().phase(), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn mode_switch_resets_both() {
        let mut adapter = GaitAdapter::new(trot(), 20, false, Some(fast_params()));
        adapter.run(0.13, 2.0, &mut seeded_rng(0)).unwrap();
        adapter.set_gait_mode(true);
        adapter.compute_contact_sequence(None, &mut always_exit_rng()).unwrap();
        adapter.set_gait_mode(false);

        assert_eq!(adapter.mode(), GaitMode::Periodic);
        assert_eq!(adapter.random_generator().state(), &GeneratorState::default());
        assert_eq!(adapter.current_contact(), FULL_STANCE);

        let fresh = GaitAdapter::new(trot(), 20, false, Some(fast_params()));
        let timing = [TimingSegment::new(0.02, 20)];
        let after_switch = adapter
            .compute_contact_sequence(Some(&timing), &mut seeded_rng(0))
            .unwrap();
        let expected = fresh.periodic_generator().compute_contact_sequence(&timing).unwrap();
        assert_eq!(after_switch, expected);
    }

    #[test]
    fn random_and_periodic_differ() {
        let mut adapter = GaitAdapter::new(trot(), 20, false, None);
        let periodic = adapter.compute_contact_sequence(None, &mut seeded_rng(0)).unwrap();
        adapter.set_gait_mode(true);
        let random = adapter.compute_contact_sequence(None, &mut seeded_rng(0)).unwrap();
        assert_ne!(periodic, random);
    }

    #[test]
    fn full_stance_override() {
        let mut adapter = GaitAdapter::new(trot(), 12, true, Some(fast_params()));
        adapter.compute_contact_sequence(None, &mut always_exit_rng()).unwrap();
        adapter.run(0.05, 2.0, &mut always_exit_rng()).unwrap();
        adapter.set_full_stance();
        assert_eq!(adapter.current_contact(), FULL_STANCE);
        assert_eq!(adapter.random_generator().state(), &GeneratorState::default());
        assert_eq!(adapter.periodic_generator().gait(), GaitType::FullStance);

        adapter.restore_previous_gait();
        assert_eq!(adapter.periodic_generator().gait(), GaitType::Trot);
    }

    #[test]
    fn start_and_stop_ignored_in_random_mode() {
        let mut adapter = GaitAdapter::new(trot(), 12, true, None);
        adapter.update_start_and_stop(&StartStopInput::default());
        assert_eq!(adapter.periodic_generator().gait(), GaitType::Trot);

        adapter.set_gait_mode(false);
        adapter.update_start_and_stop(&StartStopInput::default());
        assert_eq!(adapter.periodic_generator().gait(), GaitType::FullStance);
    }

    #[test]
    fn from_config_uses_explicit_parameters() {
        let config = PlannerConfig {
            random_gait: Some(fast_params()),
            ..PlannerConfig::default()
        };
        let adapter = GaitAdapter::from_config(&config);
        assert_eq!(adapter.random_generator().params(), &fast_params());
        assert_eq!(adapter.horizon(), config.horizon);
        assert_eq!(adapter.mode(), GaitMode::Random);
    }
}
