//! QDR Gate-Sequence Intermediate Representation
//!
//! This crate provides the gate-level data structures shared by the
//! simulator, the variational-circuit engine and the optimizer adapter.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered, validated sequence of [`Instruction`]s over a
//! fixed number of qubits. Each instruction pairs a [`StandardGate`] (with
//! concrete rotation angles) with the [`QubitId`]s it acts on. Instructions
//! can be remapped through a placement table, which is how a block written
//! for local qubits `0..k` is embedded into a wider circuit.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qdr_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell_state", 2);
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Example: Placing a Block
//!
//! ```rust
//! use qdr_ir::{Instruction, QubitId, StandardGate};
//!
//! // A CRX written for local qubits (0, 1) lands on parent qubits (3, 1).
//! let local = Instruction::two_qubit_gate(StandardGate::CRx(0.5), QubitId(0), QubitId(1));
//! let placed = local.remap(&[3, 1]).unwrap();
//! assert_eq!(placed.qubits, vec![QubitId(3), QubitId(1)]);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Z` | 1 | Pauli gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotations |
//! | `CX`, `CZ` | 2 | Controlled Paulis |
//! | `CRx` | 2 | Controlled X rotation |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
