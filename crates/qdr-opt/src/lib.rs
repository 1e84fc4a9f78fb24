//! Classical optimization of variational circuits.
//!
//! Three gradient-free minimizers implement [`Optimizer`]:
//!
//! - [`NelderMead`]: simplex search with a shrinking trust radius
//! - [`Powell`]: conjugate directions with golden-section line search
//! - [`Spsa`]: seeded simultaneous perturbation
//!
//! [`OptimizerConfig`] picks one at runtime and can be loaded from YAML or
//! JSON. [`VariationalProblem`] (and the [`circ_minimize`] /
//! [`circ_maximize`] shorthands) wires a
//! [`VariationalCircuit`](qdr_circuit::VariationalCircuit), an input state
//! and a measurement function into an objective for any of them.
//!
//! # Example
//!
//! ```rust
//! use qdr_circuit::{BlockSpec, VariationalCircuit};
//! use qdr_opt::{OptimizerConfig, circ_maximize};
//! use qdr_sim::{QuantumState, SimError};
//!
//! let mut circuit = VariationalCircuit::new(1).unwrap();
//! circuit.add_block(BlockSpec::new("local")).unwrap();
//! let input = QuantumState::zero(1).unwrap();
//!
//! // Drive |0⟩ to |1⟩.
//! let p1 = |s: &QuantumState| Ok::<_, SimError>(s.probabilities()[1]);
//! let x0 = vec![0.1; circuit.num_parameters()];
//! let optimum = circ_maximize(&mut circuit, &input, p1, &OptimizerConfig::default(), x0).unwrap();
//! assert!(optimum.value > 0.999);
//! ```

pub mod config;
pub mod error;
pub mod nelder_mead;
pub mod optimizer;
pub mod powell;
pub mod problem;
pub mod spsa;

pub use config::{Method, OptimizerConfig};
pub use error::{OptError, OptResult};
pub use nelder_mead::NelderMead;
pub use optimizer::{Bounds, OptimizationResult, Optimizer};
pub use powell::Powell;
pub use problem::{CircuitOptimum, VariationalProblem, circ_maximize, circ_minimize};
pub use spsa::Spsa;
