//! Hermitian eigen-decomposition helpers on top of nalgebra.

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;
use num_complex::Complex64;

/// Copy a dense ndarray operator into nalgebra storage.
pub(crate) fn to_dmatrix(matrix: &Array2<Complex64>) -> DMatrix<Complex64> {
    let (rows, cols) = matrix.dim();
    DMatrix::from_fn(rows, cols, |i, j| matrix[[i, j]])
}

/// Eigenvalues of a Hermitian matrix.
///
/// The input is symmetrised first, so rounding noise in the off-diagonal
/// entries cannot push the decomposition off the real axis.
pub(crate) fn hermitian_eigenvalues(matrix: DMatrix<Complex64>) -> DVector<f64> {
    hermitize(matrix).symmetric_eigenvalues()
}

/// Principal square root of a positive semi-definite Hermitian matrix.
///
/// Negative eigenvalues from rounding are clamped to zero.
pub(crate) fn psd_sqrt(matrix: DMatrix<Complex64>) -> DMatrix<Complex64> {
    let eigen = hermitize(matrix).symmetric_eigen();
    let roots = eigen
        .eigenvalues
        .map(|lambda| Complex64::new(lambda.max(0.0).sqrt(), 0.0));
    let vectors = &eigen.eigenvectors;
    vectors * DMatrix::from_diagonal(&roots) * vectors.adjoint()
}

fn hermitize(matrix: DMatrix<Complex64>) -> DMatrix<Complex64> {
    let adjoint = matrix.adjoint();
    (matrix + adjoint).scale(0.5)
}
