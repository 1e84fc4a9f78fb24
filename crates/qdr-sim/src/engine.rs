//! Simulation engine trait and the dense implementation.

use qdr_ir::Circuit;
use tracing::trace;

use crate::error::SimResult;
use crate::state::QuantumState;
use crate::unitary::Unitary;

/// Turns gate sequences into operators and applies them to states.
///
/// Implementations must be deterministic: the same circuit always compiles
/// to the same operator.
pub trait SimulationEngine {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Build the operator of a gate sequence.
    fn compile(&self, circuit: &Circuit) -> SimResult<Unitary>;

    /// Apply an operator to a state, following the state's kind.
    fn evolve(&self, unitary: &Unitary, state: &QuantumState) -> SimResult<QuantumState>;

    /// Run a gate sequence on a state without compiling it first. Used for
    /// registers too wide for a dense operator.
    fn simulate(&self, circuit: &Circuit, state: &QuantumState) -> SimResult<QuantumState> {
        state.apply_circuit(circuit)
    }
}

/// Exact dense simulation via column-by-column statevector evolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseEngine;

impl SimulationEngine for DenseEngine {
    fn name(&self) -> &str {
        "dense"
    }

    fn compile(&self, circuit: &Circuit) -> SimResult<Unitary> {
        trace!(
            circuit = circuit.name(),
            gates = circuit.len(),
            qubits = circuit.num_qubits(),
            "Compiling dense unitary"
        );
        Unitary::from_circuit(circuit)
    }

    fn evolve(&self, unitary: &Unitary, state: &QuantumState) -> SimResult<QuantumState> {
        state.evolve(unitary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use qdr_ir::QubitId;

    #[test]
    fn test_dense_engine_bell() {
        let mut circuit = Circuit::new("bell", 2);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let engine = DenseEngine;
        let u = engine.compile(&circuit).unwrap();
        let out = engine.evolve(&u, &QuantumState::zero(2).unwrap()).unwrap();
        let probs = out.probabilities();
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[3] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_simulate_matches_compiled_evolution() {
        let mut circuit = Circuit::new("mix", 3);
        circuit
            .ry(0.4, QubitId(0))
            .unwrap()
            .crx(1.1, QubitId(0), QubitId(2))
            .unwrap()
            .rz(-0.3, QubitId(2))
            .unwrap();
        let engine = DenseEngine;
        let input = QuantumState::basis(3, 0b011).unwrap();
        let compiled = engine
            .evolve(&engine.compile(&circuit).unwrap(), &input)
            .unwrap();
        let direct = engine.simulate(&circuit, &input).unwrap();
        let (QuantumState::Ket(a), QuantumState::Ket(b)) = (compiled, direct) else {
            panic!("expected kets");
        };
        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_simulate_beyond_dense_limit() {
        let width = crate::MAX_DENSE_QUBITS + 1;
        let mut circuit = Circuit::new("flip", width as u32);
        for q in 0..width as u32 {
            circuit.x(QubitId(q)).unwrap();
        }
        let engine = DenseEngine;
        assert!(matches!(
            engine.compile(&circuit),
            Err(SimError::TooManyQubits { .. })
        ));
        let out = engine
            .simulate(&circuit, &QuantumState::zero(width).unwrap())
            .unwrap();
        assert!((out.probabilities()[(1 << width) - 1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_evolve_width_mismatch() {
        let engine = DenseEngine;
        let u = engine.compile(&Circuit::new("id", 2)).unwrap();
        let result = engine.evolve(&u, &QuantumState::zero(3).unwrap());
        assert!(matches!(
            result,
            Err(SimError::QubitMismatch {
                expected: 2,
                got: 3
            })
        ));
    }
}
