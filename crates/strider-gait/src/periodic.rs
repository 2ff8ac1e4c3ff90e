//! Periodic gait generator.
//!
//! Produces contact sequences from a fixed gait pattern. Each gait is defined by:
//! - Phase offsets per leg (when in the cycle each leg lifts)
//! - Duty factor (fraction of cycle spent in stance)
//! - Step frequency (gait cycles per second)

use strider_core::{
    ContactSequence, ContactState, FULL_STANCE, GaitError, GaitType, LEG_COUNT, PeriodicConfig,
};

/// Commanded speed (m/s or rad/s) below which the robot is asked to stand.
const STOP_COMMAND_THRESHOLD: f64 = 0.01;

/// Measured base speed (m/s) below which the robot counts as settled.
const SETTLED_BASE_SPEED: f64 = 0.1;

/// One block of a non-uniform horizon: `steps` steps of `dt` seconds each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingSegment {
    pub dt: f64,
    pub steps: usize,
}

impl TimingSegment {
    pub const fn new(dt: f64, steps: usize) -> Self {
        Self { dt, steps }
    }
}

/// Motion command and measured base motion used for start/stop decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StartStopInput {
    /// Commanded planar linear speed (m/s).
    pub reference_linear_speed: f64,
    /// Commanded yaw rate (rad/s).
    pub reference_yaw_rate: f64,
    /// Measured planar base speed (m/s).
    pub base_linear_speed: f64,
}

impl StartStopInput {
    fn commanded(&self) -> bool {
        self.reference_linear_speed.abs() > STOP_COMMAND_THRESHOLD
            || self.reference_yaw_rate.abs() > STOP_COMMAND_THRESHOLD
    }
}

/// Gait generator that produces contact sequences from a periodic pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicGaitGenerator {
    /// Configured gait, restored by `reset`.
    config: PeriodicConfig,
    /// Active gait pattern.
    gait: GaitType,
    /// Gait to return to after a full-stance override.
    previous_gait: GaitType,
    duty_factor: f64,
    step_freq: f64,
    /// Current phase in the gait cycle [0, 1).
    phase: f64,
}

impl PeriodicGaitGenerator {
    pub const fn new(config: PeriodicConfig) -> Self {
        Self {
            config,
            gait: config.gait,
            previous_gait: config.gait,
            duty_factor: config.duty_factor,
            step_freq: config.step_freq,
            phase: 0.0,
        }
    }

    fn contact_at(&self, phase: f64) -> ContactState {
        if self.gait == GaitType::FullStance || self.duty_factor >= 1.0 {
            return FULL_STANCE;
        }
        let offsets = self.gait.phase_offsets();
        std::array::from_fn(|leg| (phase + offsets[leg]) % 1.0 < self.duty_factor)
    }

    /// Contact state at the current phase.
    pub fn contacts(&self) -> ContactState {
        self.contact_at(self.phase)
    }

    /// Generate a contact sequence over possibly non-uniform timesteps.
    ///
    /// Column 0 is the contact state at the current phase. The generator's own
    /// phase is not advanced.
    pub fn compute_contact_sequence(
        &self,
        segments: &[TimingSegment],
    ) -> Result<ContactSequence, GaitError> {
        let total: usize = segments.iter().map(|s| s.steps).sum();
        let mut rows: [Vec<bool>; LEG_COUNT] = std::array::from_fn(|_| Vec::with_capacity(total));
        let mut phase = self.phase;
        for segment in segments {
            if !(segment.dt.is_finite() && segment.dt > 0.0) {
                return Err(GaitError::InvalidTimestep(segment.dt));
            }
            for _ in 0..segment.steps {
                for (row, contact) in rows.iter_mut().zip(self.contact_at(phase)) {
                    row.push(contact);
                }
                phase = (phase + segment.dt * self.step_freq) % 1.0;
            }
        }
        ContactSequence::from_rows(rows)
    }

    /// Advance the phase by `dt` seconds at `step_freq` and return the contact state.
    pub fn run(&mut self, dt: f64, step_freq: f64) -> Result<ContactState, GaitError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(GaitError::InvalidTimestep(dt));
        }
        self.step_freq = step_freq;
        self.phase = (self.phase + dt * step_freq) % 1.0;
        Ok(self.contacts())
    }

    /// Back to the configured gait at phase 0.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Hold every foot on the ground until [`restore_previous_gait`](Self::restore_previous_gait).
    pub fn set_full_stance(&mut self) {
        if self.gait != GaitType::FullStance {
            self.previous_gait = self.gait;
        }
        self.gait = GaitType::FullStance;
    }

    /// Resume the gait that was active before the last full-stance override.
    pub fn restore_previous_gait(&mut self) {
        self.gait = self.previous_gait;
    }

    /// Stand still when there is no motion command and the base has settled;
    /// resume walking as soon as a command arrives.
    pub fn update_start_and_stop(&mut self, input: &StartStopInput) {
        let commanded = input.commanded();
        if !commanded
            && input.base_linear_speed < SETTLED_BASE_SPEED
            && self.gait != GaitType::FullStance
        {
            self.set_full_stance();
        } else if commanded
            && self.gait == GaitType::FullStance
            && self.previous_gait != GaitType::FullStance
        {
            self.restore_previous_gait();
        }
    }

    /// Get the current phase [0, 1).
    pub const fn phase(&self) -> f64 {
        self.phase
    }

    /// Set the phase directly (useful for testing).
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = phase.rem_euclid(1.0);
    }

    pub const fn gait(&self) -> GaitType {
        self.gait
    }

    pub const fn duty_factor(&self) -> f64 {
        self.duty_factor
    }

    pub const fn step_freq(&self) -> f64 {
        self.step_freq
    }
}
