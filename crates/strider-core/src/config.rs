use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{GaitType, LEG_COUNT};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_min_stance_duration() -> f64 {
    0.3
}
const fn default_max_stance_duration() -> f64 {
    0.8
}
const fn default_min_swing_duration() -> f64 {
    0.2
}
const fn default_max_swing_duration() -> f64 {
    0.4
}
const fn default_num_gait_samples() -> usize {
    20
}
const fn default_gait_stability_weight() -> f64 {
    1.0
}
const fn default_duty_factor() -> f64 {
    0.6
}
const fn default_step_freq() -> f64 {
    1.4
}
const fn default_horizon() -> usize {
    12
}
const fn default_true() -> bool {
    true
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite and > 0")))
    }
}

// ---------------------------------------------------------------------------
// GaitParameters
// ---------------------------------------------------------------------------

/// Duration constraints for the random leg schedule generator.
///
/// Durations are in seconds and become step counts by floor division with the
/// sampling timestep. Only the minimums drive transitions; the maximums are
/// carried for validation and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaitParameters {
    #[serde(default = "default_min_stance_duration")]
    pub min_stance_duration: f64,

    #[serde(default = "default_max_stance_duration")]
    pub max_stance_duration: f64,

    #[serde(default = "default_min_swing_duration")]
    pub min_swing_duration: f64,

    #[serde(default = "default_max_swing_duration")]
    pub max_swing_duration: f64,

    /// Forbid diagonal partners from swinging at the same time.
    #[serde(default)]
    pub enforce_diagonal_coordination: bool,
}

impl Default for GaitParameters {
    fn default() -> Self {
        Self {
            min_stance_duration: default_min_stance_duration(),
            max_stance_duration: default_max_stance_duration(),
            min_swing_duration: default_min_swing_duration(),
            max_swing_duration: default_max_swing_duration(),
            enforce_diagonal_coordination: false,
        }
    }
}

impl GaitParameters {
    /// Derive duration bounds from a periodic gait's duty factor and step frequency.
    ///
    /// Stance and swing bounds are 80%..120% of the nominal periodic phase
    /// durations. Diagonal coordination starts enabled.
    pub fn from_periodic(duty_factor: f64, step_freq: f64) -> Self {
        let period = if step_freq > 0.0 { 1.0 / step_freq } else { 1.0 };
        let stance = duty_factor * period;
        let swing = (1.0 - duty_factor) * period;
        Self {
            min_stance_duration: stance * 0.8,
            max_stance_duration: stance * 1.2,
            min_swing_duration: swing * 0.8,
            max_swing_duration: swing * 1.2,
            enforce_diagonal_coordination: true,
        }
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("min_stance_duration", self.min_stance_duration)?;
        check_positive("max_stance_duration", self.max_stance_duration)?;
        check_positive("min_swing_duration", self.min_swing_duration)?;
        check_positive("max_swing_duration", self.max_swing_duration)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SamplerConfig
// ---------------------------------------------------------------------------

/// Candidate sampling and scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Candidate schedules drawn per control tick (>= 1).
    #[serde(default = "default_num_gait_samples")]
    pub num_gait_samples: usize,

    /// Weight of the stability cost relative to the optimizer cost (>= 0).
    #[serde(default = "default_gait_stability_weight")]
    pub gait_stability_weight: f64,

    /// Minimum number of stance legs per step before penalties apply (0..=4).
    #[serde(default)]
    pub min_support_legs: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            num_gait_samples: default_num_gait_samples(),
            gait_stability_weight: default_gait_stability_weight(),
            min_support_legs: 0,
        }
    }
}

impl SamplerConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_gait_samples == 0 {
            return Err(ConfigError::invalid("num_gait_samples", "must be >= 1"));
        }
        if !(self.gait_stability_weight.is_finite() && self.gait_stability_weight >= 0.0) {
            return Err(ConfigError::invalid(
                "gait_stability_weight",
                format!("{} must be finite and >= 0", self.gait_stability_weight),
            ));
        }
        if self.min_support_legs > LEG_COUNT {
            return Err(ConfigError::invalid(
                "min_support_legs",
                format!("{} exceeds leg count {LEG_COUNT}", self.min_support_legs),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PeriodicConfig
// ---------------------------------------------------------------------------

/// Nominal periodic gait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicConfig {
    #[serde(default)]
    pub gait: GaitType,

    /// Fraction of the cycle spent in stance [0, 1].
    #[serde(default = "default_duty_factor")]
    pub duty_factor: f64,

    /// Gait cycles per second.
    #[serde(default = "default_step_freq")]
    pub step_freq: f64,
}

impl Default for PeriodicConfig {
    fn default() -> Self {
        Self {
            gait: GaitType::default(),
            duty_factor: default_duty_factor(),
            step_freq: default_step_freq(),
        }
    }
}

impl PeriodicConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.duty_factor) {
            return Err(ConfigError::invalid(
                "duty_factor",
                format!("{} outside [0, 1]", self.duty_factor),
            ));
        }
        if !self.step_freq.is_finite() || self.step_freq < 0.0 {
            return Err(ConfigError::invalid(
                "step_freq",
                format!("{} must be finite and >= 0", self.step_freq),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PlannerConfig
// ---------------------------------------------------------------------------

/// Full configuration for one gait planning session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Planning horizon in steps.
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Start in random-gait mode (periodic otherwise).
    #[serde(default = "default_true")]
    pub use_random_gait: bool,

    #[serde(default)]
    pub sampler: SamplerConfig,

    #[serde(default)]
    pub periodic: PeriodicConfig,

    /// Explicit random-gait bounds. Derived from `periodic` when absent.
    #[serde(default)]
    pub random_gait: Option<GaitParameters>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            use_random_gait: true,
            sampler: SamplerConfig::default(),
            periodic: PeriodicConfig::default(),
            random_gait: None,
        }
    }
}

impl PlannerConfig {
    /// Random-gait parameters in effect: explicit, or derived from the periodic gait.
    pub fn gait_parameters(&self) -> GaitParameters {
        self.random_gait.unwrap_or_else(|| {
            GaitParameters::from_periodic(self.periodic.duty_factor, self.periodic.step_freq)
        })
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::invalid("horizon", "must be >= 1"));
        }
        self.sampler.validate()?;
        self.periodic.validate()?;
        self.gait_parameters().validate()?;
        Ok(())
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
