pub mod band;
pub mod bounds;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod point_set;
pub mod sampler;

pub use band::BAND_ROWS;
pub use bounds::ViewBounds;
pub use error::EngineError;
pub use mapper::{apply, Mapper};
pub use pipeline::{Outcome, Pipeline, Stage};
pub use point_set::{ImageSet, PointSet};
pub use sampler::{Sample, SampleFailure, Sampler, SamplerConfig};

/// Convenience result type for the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
