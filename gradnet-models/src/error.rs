use gradnet_core::GradnetError;
use thiserror::Error;

/// Errors raised by the task models.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ModelError {
    /// An error from the graph engine, passed through unchanged.
    #[error(transparent)]
    Core(#[from] GradnetError),

    #[error("Model run produced a {found} where a {expected} was expected")]
    UnexpectedRunOutput {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Input sequence is empty")]
    EmptySequence,

    #[error("Epsilon must lie in [0, 1], got {0}")]
    InvalidEpsilon(f64),
}
