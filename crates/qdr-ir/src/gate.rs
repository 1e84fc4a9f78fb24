//! Gate set of the variational layers and the swap/Hilbert-Schmidt tests.

use serde::{Deserialize, Serialize};

/// Gates emitted by the built-in structures and the sampling circuits.
///
/// Rotation angles are concrete radians. Variational blocks are rebuilt from
/// their parameter vectors on every update, so there is no symbolic binding
/// stage. Controlled gates take the control qubit first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Z.
    Z,
    /// `exp(-iθX/2)`.
    Rx(f64),
    /// `exp(-iθY/2)`.
    Ry(f64),
    /// `exp(-iθZ/2)`.
    Rz(f64),
    /// CNOT.
    CX,
    /// Controlled-Z.
    CZ,
    /// Controlled `Rx(θ)`.
    CRx(f64),
}

impl StandardGate {
    /// Lower-case mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CRx(_) => "crx",
        }
    }

    /// Number of operands.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::CRx(_) => 2,
            _ => 1,
        }
    }

    /// Rotation angle, if the gate has one.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            StandardGate::Rx(t) | StandardGate::Ry(t) | StandardGate::Rz(t) | StandardGate::CRx(t) => {
                Some(t)
            }
            _ => None,
        }
    }

    /// Rotation angles carried by this gate.
    pub fn parameters(&self) -> Vec<f64> {
        self.angle().into_iter().collect()
    }

    /// Whether this gate carries a rotation angle.
    pub fn is_parameterized(&self) -> bool {
        self.angle().is_some()
    }

    /// The adjoint. Rotations negate their angle; the rest are self-inverse.
    pub fn inverse(&self) -> StandardGate {
        match *self {
            StandardGate::Rx(t) => StandardGate::Rx(-t),
            StandardGate::Ry(t) => StandardGate::Ry(-t),
            StandardGate::Rz(t) => StandardGate::Rz(-t),
            StandardGate::CRx(t) => StandardGate::CRx(-t),
            g => g,
        }
    }

    /// The entry-wise complex conjugate.
    ///
    /// `Ry` is real. `Rx` and `Rz` have an imaginary generator, so
    /// conjugation flips the sign of their angle.
    pub fn conjugate(&self) -> StandardGate {
        match *self {
            StandardGate::Rx(t) => StandardGate::Rx(-t),
            StandardGate::Rz(t) => StandardGate::Rz(-t),
            StandardGate::CRx(t) => StandardGate::CRx(-t),
            g => g,
        }
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.angle() {
            Some(t) => write!(f, "{}({t:.6})", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}
