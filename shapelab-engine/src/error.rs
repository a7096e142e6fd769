use shapelab_core::CoreError;
use thiserror::Error;

/// Errors originating from the sampling and mapping engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid sampler configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("evaluation failed at element {index}: {source}")]
    Evaluation { index: usize, source: CoreError },

    #[error("element {index} evaluated to a non-finite value")]
    NonFinite { index: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}
