//! Gate matrices.
//!
//! Each [`StandardGate`] resolves to a [`GateKernel`]: a plain 2x2 matrix on
//! one qubit or a 2x2 matrix applied under a control qubit.

use num_complex::Complex64;
use qdr_ir::StandardGate;
use std::f64::consts::FRAC_1_SQRT_2;
use std::ops::Mul;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 matrix in row-major order: `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2(pub [Complex64; 4]);

impl Matrix2 {
    /// Build from row-major entries.
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self([a, b, c, d])
    }

    /// Diagonal matrix `diag(a, d)`.
    pub const fn diagonal(a: Complex64, d: Complex64) -> Self {
        Self::new(a, ZERO, ZERO, d)
    }

    pub const fn identity() -> Self {
        Self::diagonal(ONE, ONE)
    }

    pub fn h() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    pub const fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    pub fn z() -> Self {
        Self::diagonal(ONE, -ONE)
    }

    pub fn rx(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        let off = Complex64::new(0.0, -s);
        Self::new(Complex64::new(c, 0.0), off, off, Complex64::new(c, 0.0))
    }

    pub fn ry(theta: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    pub fn rz(theta: f64) -> Self {
        Self::diagonal(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let [a, b, c, d] = self.0;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Entry-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).norm() < tol)
    }
}

impl Mul for Matrix2 {
    type Output = Self;

    #[allow(clippy::many_single_char_names)]
    fn mul(self, rhs: Self) -> Self {
        let [a, b, c, d] = self.0;
        let [e, f, g, h] = rhs.0;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }
}

/// How a gate acts on the statevector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateKernel {
    /// 2x2 matrix on the single operand.
    Single(Matrix2),
    /// 2x2 matrix on the target, applied where the control is |1⟩.
    Controlled(Matrix2),
}

impl GateKernel {
    /// Resolve a gate to its kernel.
    pub fn of(gate: &StandardGate) -> Self {
        match *gate {
            StandardGate::H => GateKernel::Single(Matrix2::h()),
            StandardGate::X => GateKernel::Single(Matrix2::x()),
            StandardGate::Z => GateKernel::Single(Matrix2::z()),
            StandardGate::Rx(t) => GateKernel::Single(Matrix2::rx(t)),
            StandardGate::Ry(t) => GateKernel::Single(Matrix2::ry(t)),
            StandardGate::Rz(t) => GateKernel::Single(Matrix2::rz(t)),
            StandardGate::CX => GateKernel::Controlled(Matrix2::x()),
            StandardGate::CZ => GateKernel::Controlled(Matrix2::z()),
            StandardGate::CRx(t) => GateKernel::Controlled(Matrix2::rx(t)),
        }
    }

    /// The 2x2 block, wherever it is applied.
    pub fn matrix(&self) -> Matrix2 {
        match *self {
            GateKernel::Single(m) | GateKernel::Controlled(m) => m,
        }
    }
}
