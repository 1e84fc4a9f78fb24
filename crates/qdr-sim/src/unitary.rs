//! Dense unitary operators.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use qdr_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Widest register for which a dense `2^n x 2^n` operator is built.
pub const MAX_DENSE_QUBITS: usize = 12;

/// A dense `2^n x 2^n` operator in the same basis order as [`Statevector`].
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    matrix: Array2<Complex64>,
    num_qubits: usize,
}

impl Unitary {
    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> SimResult<Self> {
        check_dense(num_qubits)?;
        Ok(Self {
            matrix: Array2::eye(1 << num_qubits),
            num_qubits,
        })
    }

    /// Compile a circuit by evolving every basis column through it.
    pub fn from_circuit(circuit: &Circuit) -> SimResult<Self> {
        let num_qubits = circuit.num_qubits() as usize;
        check_dense(num_qubits)?;
        let dim = 1usize << num_qubits;
        let mut matrix = Array2::zeros((dim, dim));
        for col in 0..dim {
            let mut column = Statevector::basis(num_qubits, col)?;
            column.apply_circuit(circuit)?;
            for (row, amp) in column.amplitudes().iter().enumerate() {
                matrix[[row, col]] = *amp;
            }
        }
        Ok(Self { matrix, num_qubits })
    }

    /// Wrap an existing square matrix without checking unitarity.
    pub fn from_matrix(matrix: Array2<Complex64>) -> SimResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SimError::NotSquare { rows, cols });
        }
        let num_qubits = crate::statevector::qubits_for_dimension(rows)?;
        check_dense(num_qubits)?;
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

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        Self {
            matrix: self.matrix.t().mapv(|c| c.conj()),
            num_qubits: self.num_qubits,
        }
    }

    /// Operator product `self · other` (apply `other` first).
    pub fn compose(&self, other: &Self) -> SimResult<Self> {
        self.check_width(other.num_qubits)?;
        Ok(Self {
            matrix: self.matrix.dot(&other.matrix),
            num_qubits: self.num_qubits,
        })
    }

    /// `U |ψ⟩`.
    pub fn apply_to(&self, state: &Statevector) -> SimResult<Statevector> {
        self.check_width(state.num_qubits())?;
        let v = Array1::from(state.amplitudes().to_vec());
        Statevector::from_amplitudes(self.matrix.dot(&v).to_vec())
    }

    /// Whether `U†U` is the identity within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        let product = self.dagger().matrix.dot(&self.matrix);
        product.indexed_iter().all(|((i, j), value)| {
            let expected = if i == j { 1.0 } else { 0.0 };
            (value - Complex64::new(expected, 0.0)).norm() < tol
        })
    }

    /// Largest entry-wise distance to another operator.
    pub fn max_distance(&self, other: &Self) -> f64 {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    pub(crate) fn check_width(&self, got: usize) -> SimResult<()> {
        if got != self.num_qubits {
            return Err(SimError::QubitMismatch {
                expected: self.num_qubits,
                got,
            });
        }
        Ok(())
    }
}

fn check_dense(num_qubits: usize) -> SimResult<()> {
    if num_qubits == 0 {
        return Err(SimError::InvalidDimension(1));
    }
    if num_qubits > MAX_DENSE_QUBITS {
        return Err(SimError::TooManyQubits {
            requested: num_qubits,
            max: MAX_DENSE_QUBITS,
        });
    }
    Ok(())
}
