//! Statevector simulation engine.

use num_complex::Complex64;
use qdr_ir::{Circuit, Instruction};
use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::matrix::{GateKernel, Matrix2};

/// Largest register a statevector will allocate.
pub const MAX_STATEVECTOR_QUBITS: usize = 26;

/// Pure-state amplitudes over `2^n` basis states.
///
/// Basis index bit `n - 1 - q` holds qubit `q`, so qubit 0 is the most
/// significant bit.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

pub(crate) fn qubits_for_dimension(dim: usize) -> SimResult<usize> {
    if dim < 2 || !dim.is_power_of_two() {
        return Err(SimError::InvalidDimension(dim));
    }
    Ok(dim.trailing_zeros() as usize)
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::InvalidDimension(1));
        }
        if num_qubits > MAX_STATEVECTOR_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: MAX_STATEVECTOR_QUBITS,
            });
        }
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(SimError::InvalidDimension(index));
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap raw amplitudes. The length must be a power of two and at least 2.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let num_qubits = qubits_for_dimension(amplitudes.len())?;
        if amplitudes.iter().any(|a| !a.re.is_finite() || !a.im.is_finite()) {
            return Err(SimError::NonFinite);
        }
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Random normalized state, Gaussian amplitudes via Box-Muller.
    pub fn random(num_qubits: usize, rng: &mut impl Rng) -> SimResult<Self> {
        let mut state = Self::new(num_qubits)?;
        for amp in &mut state.amplitudes {
            let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
            let u2: f64 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let angle = 2.0 * std::f64::consts::PI * u2;
            *amp = Complex64::from_polar(r, angle);
        }
        state.normalize();
        Ok(state)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension `2^n`.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the amplitude vector.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }

    /// Rescale to unit norm. A zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Entry-wise complex conjugate.
    pub fn conj(&self) -> Self {
        Self {
            amplitudes: self.amplitudes.iter().map(Complex64::conj).collect(),
            num_qubits: self.num_qubits,
        }
    }

    /// Inner product `⟨self|other⟩`.
    pub fn inner(&self, other: &Self) -> SimResult<Complex64> {
        if self.num_qubits != other.num_qubits {
            return Err(SimError::QubitMismatch {
                expected: self.num_qubits,
                got: other.num_qubits,
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Kronecker product `self ⊗ other`; `self` holds the leading qubits.
    pub fn tensor(&self, other: &Self) -> SimResult<Self> {
        let num_qubits = self.num_qubits + other.num_qubits;
        if num_qubits > MAX_STATEVECTOR_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: MAX_STATEVECTOR_QUBITS,
            });
        }
        let amplitudes = self
            .amplitudes
            .iter()
            .flat_map(|a| other.amplitudes.iter().map(move |b| a * b))
            .collect();
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Measurement probabilities `|a_i|^2`.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Apply every instruction of a circuit in order.
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> SimResult<()> {
        if circuit.num_qubits() as usize != self.num_qubits {
            return Err(SimError::QubitMismatch {
                expected: circuit.num_qubits() as usize,
                got: self.num_qubits,
            });
        }
        for instruction in circuit {
            self.apply(instruction)?;
        }
        Ok(())
    }

    /// Apply one instruction to the statevector.
    ///
    /// Instructions can be assembled by hand, so the operand count is
    /// checked against the gate here as well as in [`Circuit`].
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        let expected = instruction.gate.num_qubits() as usize;
        if qubits.len() != expected {
            return Err(SimError::QubitCountMismatch {
                gate: instruction.name(),
                expected,
                got: qubits.len(),
            });
        }
        for &q in &qubits {
            self.check_qubit(q)?;
        }
        match (GateKernel::of(&instruction.gate), qubits.as_slice()) {
            (GateKernel::Single(m), &[target]) => self.apply_single(target, &m),
            (GateKernel::Controlled(m), &[control, target]) => {
                if control == target {
                    return Err(SimError::QubitCountMismatch {
                        gate: instruction.name(),
                        expected,
                        got: 1,
                    });
                }
                self.apply_controlled(control, target, &m);
            }
            _ => {
                return Err(SimError::QubitCountMismatch {
                    gate: instruction.name(),
                    expected,
                    got: qubits.len(),
                });
            }
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: usize) -> SimResult<()> {
        if qubit >= self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    #[inline]
    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    fn apply_single(&mut self, qubit: usize, m: &Matrix2) {
        let mask = self.mask(qubit);
        let [a, b, c, d] = m.0;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let x = self.amplitudes[i];
                let y = self.amplitudes[j];
                self.amplitudes[i] = a * x + b * y;
                self.amplitudes[j] = c * x + d * y;
            }
        }
    }

    fn apply_controlled(&mut self, control: usize, target: usize, m: &Matrix2) {
        let control_mask = self.mask(control);
        let target_mask = self.mask(target);
        let [a, b, c, d] = m.0;
        for i in 0..self.amplitudes.len() {
            if i & control_mask != 0 && i & target_mask == 0 {
                let j = i | target_mask;
                let x = self.amplitudes[i];
                let y = self.amplitudes[j];
                self.amplitudes[i] = a * x + b * y;
                self.amplitudes[j] = c * x + d * y;
            }
        }
    }
}
