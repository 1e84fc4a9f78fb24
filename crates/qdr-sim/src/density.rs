//! Density matrix representation for mixed quantum states.
//!
//! A density matrix ρ is a positive semi-definite Hermitian matrix with
//! Tr(ρ) = 1. Pure states give ρ = |ψ⟩⟨ψ| and Tr(ρ²) = 1; the maximally
//! mixed state on n qubits has Tr(ρ²) = 2^-n.
//!
//! Reduced states are obtained with [`DensityMatrix::partial_trace`], which
//! keeps the listed qubits (in ascending order) and traces out the rest.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::statevector::{Statevector, qubits_for_dimension};
use crate::unitary::{MAX_DENSE_QUBITS, Unitary};

/// Dense `2^n x 2^n` density matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    matrix: Array2<Complex64>,
    num_qubits: usize,
}

impl DensityMatrix {
    /// `|ψ⟩⟨ψ|` for a pure state.
    pub fn from_statevector(state: &Statevector) -> SimResult<Self> {
        let num_qubits = state.num_qubits();
        check_width(num_qubits)?;
        let amps = state.amplitudes();
        let dim = amps.len();
        let matrix = Array2::from_shape_fn((dim, dim), |(i, j)| amps[i] * amps[j].conj());
        Ok(Self { matrix, num_qubits })
    }

    /// Wrap a square matrix whose side is a power of two.
    pub fn from_matrix(matrix: Array2<Complex64>) -> SimResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SimError::NotSquare { rows, cols });
        }
        let num_qubits = qubits_for_dimension(rows)?;
        check_width(num_qubits)?;
        if matrix.iter().any(|a| !a.re.is_finite() || !a.im.is_finite()) {
            return Err(SimError::NonFinite);
        }
        Ok(Self { matrix, num_qubits })
    }

    /// `I / 2^n`.
    pub fn maximally_mixed(num_qubits: usize) -> SimResult<Self> {
        check_width(num_qubits)?;
        let dim = 1usize << num_qubits;
        let matrix = Array2::<Complex64>::eye(dim) / Complex64::new(dim as f64, 0.0);
        Ok(Self { matrix, num_qubits })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }

    /// Tr(ρ).
    pub fn trace(&self) -> f64 {
        self.matrix.diag().iter().map(|c| c.re).sum()
    }

    /// Tr(ρ²) = Σᵢⱼ ρᵢⱼ ρⱼᵢ.
    pub fn purity(&self) -> f64 {
        let dim = self.dimension();
        let mut acc = Complex64::new(0.0, 0.0);
        for i in 0..dim {
            for j in 0..dim {
                acc += self.matrix[[i, j]] * self.matrix[[j, i]];
            }
        }
        acc.re
    }

    /// Real parts of the diagonal: the computational-basis distribution.
    pub fn diagonal(&self) -> Vec<f64> {
        self.matrix.diag().iter().map(|c| c.re).collect()
    }

    /// `ρ ⊗ σ`; `self` holds the leading qubits.
    pub fn tensor(&self, other: &Self) -> SimResult<Self> {
        let num_qubits = self.num_qubits + other.num_qubits;
        check_width(num_qubits)?;
        let d2 = other.dimension();
        let dim = self.dimension() * d2;
        let matrix = Array2::from_shape_fn((dim, dim), |(i, j)| {
            self.matrix[[i / d2, j / d2]] * other.matrix[[i % d2, j % d2]]
        });
        Ok(Self { matrix, num_qubits })
    }

    /// `U ρ U†`.
    pub fn evolve(&self, unitary: &Unitary) -> SimResult<Self> {
        unitary.check_width(self.num_qubits)?;
        let u = unitary.matrix();
        let u_dag = u.t().mapv(|c| c.conj());
        Ok(Self {
            matrix: u.dot(&self.matrix).dot(&u_dag),
            num_qubits: self.num_qubits,
        })
    }

    /// Reduced state on `keep`, tracing out every other qubit.
    pub fn partial_trace(&self, keep: &[usize]) -> SimResult<Self> {
        let split = Subsystem::new(self.num_qubits, keep)?;
        let kept_dim = 1usize << split.kept.len();
        let traced_dim = 1usize << split.traced.len();
        let mut reduced = Array2::zeros((kept_dim, kept_dim));
        for ri in 0..kept_dim {
            for rj in 0..kept_dim {
                let mut acc = Complex64::new(0.0, 0.0);
                for t in 0..traced_dim {
                    acc += self.matrix[[split.index(ri, t), split.index(rj, t)]];
                }
                reduced[[ri, rj]] = acc;
            }
        }
        Ok(Self {
            matrix: reduced,
            num_qubits: split.kept.len(),
        })
    }

    /// Whether Hermitian with unit trace, within `tol`.
    pub fn is_valid(&self, tol: f64) -> bool {
        if (self.trace() - 1.0).abs() > tol {
            return false;
        }
        self.matrix
            .indexed_iter()
            .all(|((i, j), v)| (v - self.matrix[[j, i]].conj()).norm() <= tol)
    }
}

fn check_width(num_qubits: usize) -> SimResult<()> {
    if num_qubits > MAX_DENSE_QUBITS {
        return Err(SimError::TooManyQubits {
            requested: num_qubits,
            max: MAX_DENSE_QUBITS,
        });
    }
    Ok(())
}

/// A split of the register into kept and traced qubits.
///
/// `index(k, t)` rebuilds a full basis index from a kept-subsystem index `k`
/// and a traced-subsystem index `t`, each using the most-significant-first
/// ordering of their own qubit lists.
pub(crate) struct Subsystem {
    num_qubits: usize,
    pub(crate) kept: Vec<usize>,
    pub(crate) traced: Vec<usize>,
}

impl Subsystem {
    pub(crate) fn new(num_qubits: usize, keep: &[usize]) -> SimResult<Self> {
        let mut kept = keep.to_vec();
        kept.sort_unstable();
        for pair in kept.windows(2) {
            if pair[0] == pair[1] {
                return Err(SimError::DuplicateSubsystemQubit(pair[0]));
            }
        }
        if let Some(&q) = kept.iter().find(|&&q| q >= num_qubits) {
            return Err(SimError::QubitOutOfRange { qubit: q, num_qubits });
        }
        if kept.is_empty() {
            return Err(SimError::InvalidDimension(1));
        }
        let traced = (0..num_qubits).filter(|q| !kept.contains(q)).collect();
        Ok(Self {
            num_qubits,
            kept,
            traced,
        })
    }

    pub(crate) fn index(&self, kept_index: usize, traced_index: usize) -> usize {
        let mut full = 0usize;
        scatter(&mut full, self.num_qubits, &self.kept, kept_index);
        scatter(&mut full, self.num_qubits, &self.traced, traced_index);
        full
    }
}

fn scatter(full: &mut usize, num_qubits: usize, qubits: &[usize], local: usize) {
    let width = qubits.len();
    for (m, &q) in qubits.iter().enumerate() {
        if (local >> (width - 1 - m)) & 1 == 1 {
            *full |= 1 << (num_qubits - 1 - q);
        }
    }
}
