//! Tagged quantum states.

use ndarray::Array2;
use num_complex::Complex64;
use qdr_ir::Circuit;
use rand::Rng;
use std::fmt;

use crate::density::{DensityMatrix, Subsystem};
use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;
use crate::unitary::Unitary;

/// Which representation a [`QuantumState`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Ket,
    Bra,
    Density,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Ket => write!(f, "ket"),
            StateKind::Bra => write!(f, "bra"),
            StateKind::Density => write!(f, "density matrix"),
        }
    }
}

/// A state a circuit can act on.
///
/// * `Ket(ψ)` evolves as `U|ψ⟩`.
/// * `Bra(b)` holds the row vector `⟨ψ|` (entries are the conjugated ket
///   amplitudes) and evolves as `⟨ψ|U†`.
/// * `Density(ρ)` evolves as `UρU†`.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantumState {
    Ket(Statevector),
    Bra(Statevector),
    Density(DensityMatrix),
}

impl QuantumState {
    /// `|0...0⟩`.
    pub fn zero(num_qubits: usize) -> SimResult<Self> {
        Ok(QuantumState::Ket(Statevector::new(num_qubits)?))
    }

    /// Computational basis ket `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> SimResult<Self> {
        Ok(QuantumState::Ket(Statevector::basis(num_qubits, index)?))
    }

    /// Ket from raw amplitudes.
    pub fn ket(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        Ok(QuantumState::Ket(Statevector::from_amplitudes(amplitudes)?))
    }

    /// Density matrix from a raw square matrix.
    pub fn density(matrix: Array2<Complex64>) -> SimResult<Self> {
        Ok(QuantumState::Density(DensityMatrix::from_matrix(matrix)?))
    }

    /// Random normalized ket.
    pub fn random_ket(num_qubits: usize, rng: &mut impl Rng) -> SimResult<Self> {
        Ok(QuantumState::Ket(Statevector::random(num_qubits, rng)?))
    }

    pub fn kind(&self) -> StateKind {
        match self {
            QuantumState::Ket(_) => StateKind::Ket,
            QuantumState::Bra(_) => StateKind::Bra,
            QuantumState::Density(_) => StateKind::Density,
        }
    }

    pub fn num_qubits(&self) -> usize {
        match self {
            QuantumState::Ket(v) | QuantumState::Bra(v) => v.num_qubits(),
            QuantumState::Density(rho) => rho.num_qubits(),
        }
    }

    /// Whether the state is a ket or bra.
    pub fn is_pure_vector(&self) -> bool {
        !matches!(self, QuantumState::Density(_))
    }

    /// Hermitian conjugate: ket ↔ bra, density matrices are unchanged.
    pub fn dagger(&self) -> Self {
        match self {
            QuantumState::Ket(v) => QuantumState::Bra(v.conj()),
            QuantumState::Bra(v) => QuantumState::Ket(v.conj()),
            QuantumState::Density(rho) => QuantumState::Density(rho.clone()),
        }
    }

    /// The ket amplitudes for a vector state.
    pub fn as_ket(&self) -> Option<Statevector> {
        match self {
            QuantumState::Ket(v) => Some(v.clone()),
            QuantumState::Bra(v) => Some(v.conj()),
            QuantumState::Density(_) => None,
        }
    }

    /// Density-matrix form.
    pub fn to_density(&self) -> SimResult<DensityMatrix> {
        match self {
            QuantumState::Density(rho) => Ok(rho.clone()),
            QuantumState::Ket(v) => DensityMatrix::from_statevector(v),
            QuantumState::Bra(v) => DensityMatrix::from_statevector(&v.conj()),
        }
    }

    /// Computational-basis distribution.
    pub fn probabilities(&self) -> Vec<f64> {
        match self {
            QuantumState::Ket(v) | QuantumState::Bra(v) => v.probabilities(),
            QuantumState::Density(rho) => rho.diagonal(),
        }
    }

    /// Tr(ρ²); `(⟨ψ|ψ⟩)²` for vectors.
    pub fn purity(&self) -> f64 {
        match self {
            QuantumState::Ket(v) | QuantumState::Bra(v) => v.norm().powi(4),
            QuantumState::Density(rho) => rho.purity(),
        }
    }

    /// Reduced density matrix on `keep`.
    ///
    /// Vector states are reduced straight from their amplitudes without
    /// building the full density matrix.
    pub fn reduced(&self, keep: &[usize]) -> SimResult<DensityMatrix> {
        let ket = match self {
            QuantumState::Density(rho) => return rho.partial_trace(keep),
            QuantumState::Ket(v) => v.clone(),
            QuantumState::Bra(v) => v.conj(),
        };
        let split = Subsystem::new(ket.num_qubits(), keep)?;
        let amps = ket.amplitudes();
        let kept_dim = 1usize << split.kept.len();
        let traced_dim = 1usize << split.traced.len();
        let mut matrix = Array2::zeros((kept_dim, kept_dim));
        for ri in 0..kept_dim {
            for rj in 0..kept_dim {
                let mut acc = Complex64::new(0.0, 0.0);
                for t in 0..traced_dim {
                    acc += amps[split.index(ri, t)] * amps[split.index(rj, t)].conj();
                }
                matrix[[ri, rj]] = acc;
            }
        }
        DensityMatrix::from_matrix(matrix)
    }

    /// Joint state `self ⊗ other`. Vector pairs stay vectors when they share
    /// a kind; any other combination becomes a density matrix.
    pub fn tensor(&self, other: &Self) -> SimResult<Self> {
        match (self, other) {
            (QuantumState::Ket(a), QuantumState::Ket(b)) => Ok(QuantumState::Ket(a.tensor(b)?)),
            (QuantumState::Bra(a), QuantumState::Bra(b)) => Ok(QuantumState::Bra(a.tensor(b)?)),
            _ => Ok(QuantumState::Density(
                self.to_density()?.tensor(&other.to_density()?)?,
            )),
        }
    }

    /// Apply a unitary according to the state's kind.
    pub fn evolve(&self, unitary: &Unitary) -> SimResult<Self> {
        match self {
            QuantumState::Ket(v) => Ok(QuantumState::Ket(unitary.apply_to(v)?)),
            QuantumState::Bra(b) => {
                let ket = unitary.apply_to(&b.conj())?;
                Ok(QuantumState::Bra(ket.conj()))
            }
            QuantumState::Density(rho) => Ok(QuantumState::Density(rho.evolve(unitary)?)),
        }
    }

    /// Run a gate sequence one gate at a time.
    ///
    /// Kets and bras never build the dense operator, so they reach the full
    /// statevector width. Density matrices are evolved through
    /// [`Unitary::from_circuit`].
    pub fn apply_circuit(&self, circuit: &Circuit) -> SimResult<Self> {
        match self {
            QuantumState::Ket(v) => {
                let mut out = v.clone();
                out.apply_circuit(circuit)?;
                Ok(QuantumState::Ket(out))
            }
            QuantumState::Bra(b) => {
                let mut ket = b.conj();
                ket.apply_circuit(circuit)?;
                Ok(QuantumState::Bra(ket.conj()))
            }
            QuantumState::Density(rho) => Ok(QuantumState::Density(
                rho.evolve(&Unitary::from_circuit(circuit)?)?,
            )),
        }
    }

    /// Structural sanity: finite entries and, for density matrices, a
    /// square power-of-two shape. Constructors already enforce this; the
    /// check guards states assembled from raw parts.
    pub fn validate(&self) -> SimResult<()> {
        let finite = |c: &Complex64| c.re.is_finite() && c.im.is_finite();
        let ok = match self {
            QuantumState::Ket(v) | QuantumState::Bra(v) => v.amplitudes().iter().all(finite),
            QuantumState::Density(rho) => rho.matrix().iter().all(finite),
        };
        if ok { Ok(()) } else { Err(SimError::NonFinite) }
    }
}

impl From<Statevector> for QuantumState {
    fn from(v: Statevector) -> Self {
        QuantumState::Ket(v)
    }
}

impl From<DensityMatrix> for QuantumState {
    fn from(rho: DensityMatrix) -> Self {
        QuantumState::Density(rho)
    }
}
