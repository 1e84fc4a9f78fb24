//! Purity and fidelity cost functions.

use num_complex::Complex64;
use qdr_sim::{DensityMatrix, QuantumState, Statevector};

use crate::error::{MeasureError, MeasureResult};
use crate::linalg::{hermitian_eigenvalues, psd_sqrt, to_dmatrix};

/// Purity of the disentangled system.
///
/// Without partitions this is `Tr(ρ²)` of the whole state. With partitions
/// it is the product of the purities of each partition's reduced state, which
/// reaches 1 exactly when the state is a product of pure states over the
/// partition.
pub fn sep_purity(state: &QuantumState, partitions: Option<&[Vec<usize>]>) -> MeasureResult<f64> {
    let Some(partitions) = partitions else {
        return Ok(state.purity());
    };
    let mut purity = 1.0;
    for (i, part) in partitions.iter().enumerate() {
        if part.is_empty() {
            return Err(MeasureError::EmptyPartition(i));
        }
        purity *= state.reduced(part)?.purity();
    }
    Ok(purity)
}

/// Uhlmann fidelity `Tr√(√ρ σ √ρ)`.
///
/// Two vectors give `|⟨ψ|φ⟩|`, a vector and a density matrix give
/// `√⟨ψ|σ|ψ⟩`; only two density matrices take the eigen-decomposition path.
pub fn fidelity(a: &QuantumState, b: &QuantumState) -> MeasureResult<f64> {
    if a.num_qubits() != b.num_qubits() {
        return Err(MeasureError::WidthMismatch {
            left: a.num_qubits(),
            right: b.num_qubits(),
        });
    }
    match (a.as_ket(), b.as_ket()) {
        (Some(psi), Some(phi)) => Ok(psi.inner(&phi)?.norm()),
        (Some(psi), None) => mixed_pure_fidelity(&psi, &b.to_density()?),
        (None, Some(phi)) => mixed_pure_fidelity(&phi, &a.to_density()?),
        (None, None) => Ok(mixed_fidelity(&a.to_density()?, &b.to_density()?)),
    }
}

/// Fidelity between a (sub)system and a reference state.
///
/// With `subsystem` the state is first reduced to those qubits; the
/// reference must then act on exactly `subsystem.len()` qubits, otherwise on
/// as many qubits as the state.
pub fn fid_ref(
    state: &QuantumState,
    reference: &QuantumState,
    subsystem: Option<&[usize]>,
) -> MeasureResult<f64> {
    let expected = subsystem.map_or(state.num_qubits(), <[usize]>::len);
    if reference.num_qubits() != expected {
        return Err(MeasureError::ReferenceSize {
            expected,
            got: reference.num_qubits(),
        });
    }
    match subsystem {
        Some(keep) => {
            let reduced = QuantumState::Density(state.reduced(keep)?);
            fidelity(&reduced, reference)
        }
        None => fidelity(state, reference),
    }
}

fn mixed_pure_fidelity(psi: &Statevector, sigma: &DensityMatrix) -> MeasureResult<f64> {
    let amps = psi.amplitudes();
    let m = sigma.matrix();
    let mut acc = Complex64::new(0.0, 0.0);
    for (i, ai) in amps.iter().enumerate() {
        for (j, aj) in amps.iter().enumerate() {
            acc += ai.conj() * m[[i, j]] * aj;
        }
    }
    Ok(acc.re.max(0.0).sqrt())
}

fn mixed_fidelity(rho: &DensityMatrix, sigma: &DensityMatrix) -> f64 {
    let sqrt_rho = psd_sqrt(to_dmatrix(rho.matrix()));
    let inner = &sqrt_rho * to_dmatrix(sigma.matrix()) * &sqrt_rho;
    hermitian_eigenvalues(inner)
        .iter()
        .map(|lambda| lambda.max(0.0).sqrt())
        .sum()
}
