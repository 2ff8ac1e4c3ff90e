// strider-core: Leg indexing, contact sequences, config, seeds, errors and the force optimizer interface.

pub mod config;
pub mod error;
pub mod seed;
pub mod traits;
pub mod types;

pub use config::{GaitParameters, PeriodicConfig, PlannerConfig, SamplerConfig};
pub use error::{ConfigError, GaitError, OptimizerError, PlanningError, StriderError};
pub use traits::{ForceOptimizer, OptimizerOutput, Params, StateVector};
pub use types::{
    ContactSequence, ContactState, FULL_STANCE, GaitType, LEG_COUNT, LEG_PROCESSING_ORDER, Leg,
    LegState, contacts_from_slice,
};
