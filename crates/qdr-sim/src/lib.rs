//! Exact dense simulation for variational circuits.
//!
//! Provides the operator and state types the circuit engine works with:
//!
//! - [`Statevector`]: pure-state amplitudes with in-place gate kernels
//! - [`Unitary`]: the dense operator of a gate sequence
//! - [`DensityMatrix`]: mixed states, purity and partial trace
//! - [`QuantumState`]: the tagged ket / bra / density variant
//! - [`SimulationEngine`]: the compile-and-evolve seam, implemented by
//!   [`DenseEngine`]
//!
//! Qubit 0 is the most significant bit of every basis index.
//!
//! # Example
//!
//! ```rust
//! use qdr_ir::{Circuit, QubitId};
//! use qdr_sim::{DenseEngine, QuantumState, SimulationEngine};
//!
//! let mut circuit = Circuit::new("bell", 2);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let engine = DenseEngine;
//! let unitary = engine.compile(&circuit).unwrap();
//! let out = engine.evolve(&unitary, &QuantumState::zero(2).unwrap()).unwrap();
//!
//! let reduced = out.reduced(&[0]).unwrap();
//! assert!((reduced.purity() - 0.5).abs() < 1e-10);
//! ```

pub mod density;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod state;
pub mod statevector;
pub mod unitary;

pub use density::DensityMatrix;
pub use engine::{DenseEngine, SimulationEngine};
pub use error::{SimError, SimResult};
pub use matrix::{GateKernel, Matrix2};
pub use state::{QuantumState, StateKind};
pub use statevector::{MAX_STATEVECTOR_QUBITS, Statevector};
pub use unitary::{MAX_DENSE_QUBITS, Unitary};
