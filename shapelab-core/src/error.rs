use thiserror::Error;

use crate::expr::Kind;

/// Errors originating from the core math and expression engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("syntax error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("expected a {expected} expression, found a {found} one")]
    Kind { expected: Kind, found: Kind },

    #[error("name '{0}' is not defined")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{function}() takes {expected} argument(s), {found} given")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error in {function}: {reason}")]
    Domain {
        function: &'static str,
        reason: &'static str,
    },

    #[error("invalid sample grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("degenerate line: a and b cannot both be zero")]
    DegenerateLine,

    #[error("invalid shape: {reason}")]
    InvalidShape { reason: String },
}
