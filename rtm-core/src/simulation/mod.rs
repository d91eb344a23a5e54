pub mod engine;
pub mod executor;
pub mod inputs;
pub mod sweep;

pub use engine::{engine_by_name, Engine, EngineError, OutputSpec, SyntheticEngine, ENGINE_NAMES};
pub use executor::SweepExecutor;
pub use inputs::{
    parameter_info, AerosolProfile, AtmosphereProfile, Inputs, ParameterInfo, ParameterKind,
    PARAMETERS,
};
pub use sweep::{SweepAxis, SweepSimulation, SweepValues, MAX_SWEEP_STEPS};

use rtm_dataset::DatasetError;

#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },
    #[error("sweep axis '{0}' has no values")]
    EmptyAxis(String),
    #[error("parameter '{0}' is swept more than once")]
    DuplicateAxis(String),
    #[error("sweep holds more than {max} steps")]
    TooManySteps { max: usize },
    #[error("unknown engine '{0}'")]
    UnknownEngine(String),
    #[error("step {step}: {source}")]
    Engine {
        step: usize,
        #[source]
        source: EngineError,
    },
    #[error("failed to start worker pool: {0}")]
    Pool(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
