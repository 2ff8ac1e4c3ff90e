use thiserror::Error;

use crate::types::LegState;

/// Top-level error type for the strider workspace.
#[derive(Debug, Error)]
pub enum StriderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gait error: {0}")]
    Gait(#[from] GaitError),

    #[error("Planning error: {0}")]
    Planning(#[from] PlanningError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Contact schedule generation errors.
///
/// Copy + static messages for cheap propagation in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GaitError {
    #[error("Invalid timestep: {0} (must be finite and > 0)")]
    InvalidTimestep(f64),

    #[error("Contact shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Infeasible {phase:?} bounds: min {min_steps} steps > max {max_steps} steps")]
    InfeasibleScheduleBounds {
        phase: LegState,
        min_steps: u32,
        max_steps: u32,
    },
}

/// Failure reported by the external force optimizer for one candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    #[error("Optimizer did not converge: {0}")]
    NonConvergence(String),

    #[error("Optimizer returned invalid cost: {0}")]
    InvalidCost(f64),

    #[error("Optimizer failed: {0}")]
    Failed(String),
}

/// Errors surfaced by one planning tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    #[error("Planning failed: none of {candidates} candidate schedules was viable")]
    PlanningFailed { candidates: usize },

    #[error("Gait error: {0}")]
    Gait(#[from] GaitError),
}
