//! Cost functions for variational dimensionality reduction.
//!
//! Every function maps a [`QuantumState`](qdr_sim::QuantumState) to a scalar
//! and returns a [`MeasureResult`], so any of them can be plugged straight
//! into an optimization loop:
//!
//! - [`sep_purity`]: purity of the whole state or of a partition
//! - [`fidelity`] and [`fid_ref`]: Uhlmann fidelity, optionally against a
//!   reduced subsystem
//! - [`c_entropy`] and [`von_neumann_entropy`]: classical and quantum entropy
//! - [`dst`]: sampled purity/overlap via the destructive swap test
//! - [`hst`]: sampled `|Tr(V†U)|²/d²` via the Hilbert-Schmidt test
//! - [`qdr_cost`] and [`ptest`]: scores of a whole circuit on an input
//!
//! # Example
//!
//! ```rust
//! use qdr_measure::{fid_ref, sep_purity};
//! use qdr_sim::QuantumState;
//!
//! let state = QuantumState::basis(3, 0b100).unwrap();
//! let zero = QuantumState::zero(2).unwrap();
//!
//! assert!((fid_ref(&state, &zero, Some(&[1, 2])).unwrap() - 1.0).abs() < 1e-10);
//! let parts = vec![vec![0], vec![1, 2]];
//! assert!((sep_purity(&state, Some(&parts)).unwrap() - 1.0).abs() < 1e-10);
//! ```

pub mod cost;
pub mod entropy;
pub mod error;
mod linalg;
pub mod metrics;

pub use cost::{ptest, qdr_cost};
pub use entropy::{c_entropy, shannon_entropy, von_neumann_entropy};
pub use error::{MeasureError, MeasureResult};
pub use metrics::{fid_ref, fidelity, sep_purity};
pub use swap_test::{
    SwapTestSamples, bell_measurement_circuit, dst, dst_measurement, dst_postprocess, dst_source,
    hst, hst_circuit, hst_measurement, hst_probability,
};
