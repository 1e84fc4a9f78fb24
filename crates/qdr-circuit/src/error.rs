//! Error types for variational circuit construction and updates.

use qdr_ir::IrError;
use qdr_sim::{SimError, StateKind};
use thiserror::Error;

/// What is wrong with a block placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementIssue {
    /// Position list length differs from the block's qubit count.
    #[error("expected {expected} positions, got {got}")]
    WrongLength {
        /// Block qubit count.
        expected: usize,
        /// Positions supplied.
        got: usize,
    },

    /// The same parent qubit appears twice.
    #[error("position {0} appears more than once")]
    Duplicate(u32),

    /// A position outside the parent circuit.
    #[error("position {position} outside a {num_qubits}-qubit circuit")]
    OutOfRange {
        /// Offending position.
        position: u32,
        /// Parent width.
        num_qubits: u32,
    },

    /// A block narrower than the circuit was added without positions.
    #[error("a {block_qubits}-qubit block in a {circuit_qubits}-qubit circuit needs explicit positions")]
    MissingPositions {
        /// Block width.
        block_qubits: u32,
        /// Parent width.
        circuit_qubits: u32,
    },
}

/// What is wrong with a state handed to a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateIssue {
    /// The state has the wrong number of qubits.
    #[error("circuit acts on {expected} qubits, state has {got}")]
    Width {
        /// Circuit width.
        expected: usize,
        /// State width.
        got: usize,
    },

    /// Amplitudes or matrix entries are NaN or infinite.
    #[error("state contains non-finite entries")]
    NonFinite,
}

/// Errors raised by the registry, blocks and the variational circuit.
///
/// Every operation validates before it mutates, so an error leaves the
/// circuit exactly as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// Parameter array does not match what the structure needs.
    #[error("Structure '{structure}' on {num_qubits} qubits takes {expected} parameters, got {got}")]
    Shape {
        /// Structure name.
        structure: String,
        /// Block width.
        num_qubits: u32,
        /// Required parameter count.
        expected: usize,
        /// Supplied parameter count.
        got: usize,
    },

    /// Invalid block placement.
    #[error("Invalid placement: {0}")]
    Placement(#[from] PlacementIssue),

    /// Flat parameter vector does not cover the targeted blocks exactly.
    #[error("Expected {expected} parameters in total, got {got}")]
    ParameterCount {
        /// Sum of the targeted blocks' parameter counts.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Per-block parameter list has the wrong number of arrays.
    #[error("Expected one parameter array per block ({expected}), got {got}")]
    BlockCount {
        /// Number of targeted blocks.
        expected: usize,
        /// Arrays supplied.
        got: usize,
    },

    /// Block selector lists a block twice.
    #[error("Block {0} selected more than once")]
    DuplicateSelector(usize),

    /// Block index or range outside the block list.
    #[error("Block index {index} out of range for {len} blocks")]
    Index {
        /// Offending index (range end for ranges).
        index: usize,
        /// Number of blocks.
        len: usize,
    },

    /// State does not fit the circuit or is malformed.
    #[error("Invalid {kind} state: {issue}")]
    InvalidState {
        /// State representation.
        kind: StateKind,
        /// What is wrong.
        issue: StateIssue,
    },

    /// No structure registered under this name.
    #[error("Unknown structure '{0}'")]
    UnknownStructure(String),

    /// A block or circuit with zero qubits.
    #[error("Blocks and circuits need at least one qubit")]
    ZeroQubits,

    /// `apply_to_input` called before `add_input`.
    #[error("No input state recorded")]
    MissingInput,

    /// Structure produced an invalid gate sequence.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Simulation failure.
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;
