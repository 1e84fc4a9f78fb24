//! Variational circuits built from named, parameterized blocks.
//!
//! This crate sits between the gate IR and the optimizers:
//!
//! - [`registry`]: named structure functions and the shared built-in registry
//! - [`structures`]: the built-in layer patterns
//! - [`ansatz`]: one block, its parameters and its placement
//! - [`variational`]: the ordered block list with flat-vector updates,
//!   caching and state application
//!
//! # Example
//!
//! ```rust
//! use qdr_circuit::{BlockSelector, BlockSpec, RemovePolicy, VariationalCircuit};
//!
//! let mut circuit = VariationalCircuit::new(3).unwrap();
//! circuit.add_block(BlockSpec::new("regular")).unwrap();
//! circuit.add_block(BlockSpec::new("crx_odd")).unwrap();
//! circuit.add_block(BlockSpec::new("regular")).unwrap();
//!
//! let removed = circuit
//!     .remove_block(&BlockSelector::structure("regular", RemovePolicy::Last))
//!     .unwrap();
//! assert_eq!(removed.len(), 1);
//! assert_eq!(circuit.num_blocks(), 2);
//! ```

pub mod ansatz;
pub mod error;
pub mod registry;
pub mod structures;
pub mod variational;

pub use ansatz::Ansatz;
pub use error::{CircuitError, CircuitResult, PlacementIssue, StateIssue};
pub use registry::{BuildFn, ParamCountFn, Structure, StructureRegistry, builtin_registry};
pub use variational::{
    BlockSelector, BlockSpec, CompiledCircuit, ParameterUpdate, RemovePolicy, VariationalCircuit,
};
