//! Entropy cost functions.

use qdr_sim::QuantumState;

use crate::error::MeasureResult;
use crate::linalg::{hermitian_eigenvalues, to_dmatrix};

/// Shannon entropy (base 2) of the computational-basis distribution.
///
/// With `target` the state is first reduced to those qubits. Low values mean
/// the (sub)system sits close to a few basis states, so a classical register
/// can hold it.
pub fn c_entropy(state: &QuantumState, target: Option<&[usize]>) -> MeasureResult<f64> {
    let probabilities = match target {
        Some(keep) => state.reduced(keep)?.diagonal(),
        None => state.probabilities(),
    };
    Ok(shannon_entropy(&probabilities))
}

/// Von Neumann entropy `-Tr(ρ log₂ ρ)`. Zero for kets and bras.
pub fn von_neumann_entropy(state: &QuantumState) -> MeasureResult<f64> {
    match state {
        QuantumState::Density(rho) => {
            let eigenvalues = hermitian_eigenvalues(to_dmatrix(rho.matrix()));
            Ok(shannon_entropy(eigenvalues.as_slice()))
        }
        QuantumState::Ket(_) | QuantumState::Bra(_) => Ok(0.0),
    }
}

/// Base-2 Shannon entropy of a weight vector, normalised to sum to one.
///
/// Non-positive weights contribute nothing. An all-zero vector has entropy 0.
pub fn shannon_entropy(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().filter(|&&w| w > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }
    weights
        .iter()
        .filter(|&&w| w > 0.0)
        .map(|&w| {
            let p = w / total;
            -p * p.log2()
        })
        .sum()
}
