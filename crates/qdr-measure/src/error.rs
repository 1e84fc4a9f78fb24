//! Error types for measurement functions.

use qdr_ir::IrError;
use qdr_sim::SimError;
use rand::distributions::WeightedError;
use thiserror::Error;

/// Errors raised while evaluating a cost function.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeasureError {
    /// Reference state has the wrong number of qubits.
    #[error("Invalid reference state: must act on {expected} qubits, got {got}")]
    ReferenceSize {
        /// Width of the compared (sub)system.
        expected: usize,
        /// Width of the reference.
        got: usize,
    },

    /// Two states that must share a width do not.
    #[error("State widths differ: {left} vs {right} qubits")]
    WidthMismatch {
        /// Left operand width.
        left: usize,
        /// Right operand width.
        right: usize,
    },

    /// A partition lists no qubits.
    #[error("Partition {0} is empty")]
    EmptyPartition(usize),

    /// A partition names a qubit outside the sampled register.
    #[error("Partition qubit {qubit} out of range for {num_qubits} qubits")]
    PartitionQubit {
        /// Offending qubit.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// No samples to post-process.
    #[error("No samples to post-process")]
    NoSamples,

    /// Outcome probabilities cannot be sampled.
    #[error("Cannot sample outcome distribution: {0}")]
    Distribution(#[from] WeightedError),

    /// Invalid measurement circuit.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Simulation failure.
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for measurement functions.
pub type MeasureResult<T> = Result<T, MeasureError>;
