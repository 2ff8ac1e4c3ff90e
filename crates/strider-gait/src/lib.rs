//! Contact schedule generation for quadruped locomotion.
//!
//! Two generators sit behind one [`GaitAdapter`]:
//!
//! 1. **Random** ([`RandomGaitGenerator`]): per-leg stance/swing state machines
//!    with minimum durations, stochastic lift-off and optional diagonal
//!    coordination. Used to sample candidate schedules each control tick.
//! 2. **Periodic** ([`PeriodicGaitGenerator`]): phase-offset gait patterns
//!    (trot, pace, bound, crawl) with full-stance override and start/stop.
//!
//! The adapter owns both for a whole control session and carries the current
//! contact state from one tick to the next.

pub mod adapter;
pub mod periodic;
pub mod random;

pub use adapter::{GaitAdapter, GaitMode, ScheduleDraw};
pub use periodic::{PeriodicGaitGenerator, StartStopInput, TimingSegment};
pub use random::{GeneratorState, RandomGaitGenerator, STANCE_EXIT_PROBABILITY, StepBounds};
