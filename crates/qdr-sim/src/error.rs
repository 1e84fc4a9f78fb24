//! Error types for the simulation crate.

use qdr_ir::IrError;
use thiserror::Error;

/// Errors from state construction and evolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Amplitude or matrix length is not a power of two.
    #[error("Dimension {0} is not a power of two >= 2")]
    InvalidDimension(usize),

    /// Density matrix is not square.
    #[error("Density matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Operand sizes disagree.
    #[error("Qubit count mismatch: expected {expected}, got {got}")]
    QubitMismatch {
        /// Qubits the operator acts on.
        expected: usize,
        /// Qubits of the operand.
        got: usize,
    },

    /// Requested more qubits than dense simulation supports.
    #[error("{requested} qubits exceeds the dense limit of {max}")]
    TooManyQubits {
        /// Requested width.
        requested: usize,
        /// Maximum supported width.
        max: usize,
    },

    /// A qubit index outside the state.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit state")]
    QubitOutOfRange {
        /// Offending index.
        qubit: usize,
        /// Width of the state.
        num_qubits: usize,
    },

    /// An instruction's operand list does not fit its gate.
    #[error("Gate '{gate}' needs {expected} distinct qubits, got {got}")]
    QubitCountMismatch {
        /// Gate mnemonic.
        gate: &'static str,
        /// Operands the gate takes.
        expected: usize,
        /// Distinct operands supplied.
        got: usize,
    },

    /// A subsystem list names the same qubit twice.
    #[error("Qubit {0} listed twice in subsystem")]
    DuplicateSubsystemQubit(usize),

    /// Amplitudes contain NaN or infinity.
    #[error("State contains non-finite entries")]
    NonFinite,

    /// IR error while walking a circuit.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
