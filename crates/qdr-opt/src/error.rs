//! Error types for optimization runs.

use qdr_circuit::CircuitError;
use thiserror::Error;

/// Errors raised by the optimization adapter and configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptError {
    /// Initial point has the wrong length.
    #[error("Initial point has {got} entries, the circuit takes {expected}")]
    DimensionMismatch {
        /// Parameters of the targeted blocks.
        expected: usize,
        /// Entries in the initial point.
        got: usize,
    },

    /// Unknown optimizer name.
    #[error("Unknown optimization method '{0}' (expected nelder-mead, powell or spsa)")]
    UnknownMethod(String),

    /// Configuration values out of range.
    #[error("Invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    /// The measurement function returned NaN.
    #[error("Measurement returned NaN")]
    NotANumber,

    /// The measurement function failed.
    #[error("Measurement failed: {0}")]
    Measurement(Box<dyn std::error::Error + Send + Sync>),

    /// Circuit update or application failed.
    #[error("Circuit error: {0}")]
    Circuit(#[from] CircuitError),
}

/// Result type for optimization runs.
pub type OptResult<T> = Result<T, OptError>;
