pub mod complex;
pub mod error;
pub mod expr;
pub mod grid;
pub mod linear;
pub mod motion;
pub mod reflection;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use expr::{BoundExpression, BoundRelation, Expression, Kind, Relation};
pub use grid::SampleGrid;
pub use linear::{format_number, transform_shape, LinearImage, LinearView, Matrix2, Point2, Shape};
pub use motion::{rotate_translate_rotate, Motion, MotionKind};
pub use reflection::{
    compose_reflections, Classification, ReflectionAxis, ReflectionComposition, ReflectionEvent,
    ReflectionSession, ReflectionView,
};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
