//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// An ordered gate sequence over a fixed number of qubits.
///
/// Every instruction is validated on insertion: operands must lie inside the
/// circuit, must not repeat, and must match the gate's arity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit on `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Append a validated instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.name();
        let expected = instruction.gate.num_qubits();
        let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected,
                got,
            });
        }
        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: Some(gate_name.to_string()),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply controlled RX gate.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CRx(theta),
            control,
            target,
        ))
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Append every instruction of `other` (same qubit indices).
    pub fn append(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits > self.num_qubits {
            return Err(IrError::WidthMismatch {
                expected: self.num_qubits,
                got: other.num_qubits,
            });
        }
        self.extend(other.instructions.iter().cloned())
    }

    /// Append instructions one by one, validating each.
    pub fn extend(
        &mut self,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<&mut Self> {
        for instruction in instructions {
            self.apply(instruction)?;
        }
        Ok(self)
    }

    /// The entry-wise complex conjugate: same order, each gate conjugated.
    pub fn conjugate(&self) -> Self {
        Self {
            name: format!("{}_conj", self.name),
            num_qubits: self.num_qubits,
            instructions: self
                .instructions
                .iter()
                .map(Instruction::conjugate)
                .collect(),
        }
    }

    /// The adjoint circuit: reversed order, each gate inverted.
    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            instructions: self
                .instructions
                .iter()
                .rev()
                .map(Instruction::inverse)
                .collect(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Total number of rotation angles across all gates.
    pub fn num_angles(&self) -> usize {
        self.instructions
            .iter()
            .map(|inst| inst.gate.parameters().len())
            .sum()
    }

    /// Get the circuit depth (longest chain of gates on shared qubits).
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        for inst in &self.instructions {
            let next = inst
                .qubits
                .iter()
                .map(|q| layer[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                layer[q.index()] = next;
            }
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Iterate over the instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_builder_chain() {
        let mut circuit = Circuit::new("bell", 2);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_depth_parallel_gates() {
        let mut circuit = Circuit::new("layer", 4);
        for q in 0..4 {
            circuit.ry(0.1, QubitId(q)).unwrap();
        }
        assert_eq!(circuit.depth(), 1);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(2), QubitId(3)).unwrap();
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::new("test", 2);
        let result = circuit.h(QubitId(2));
        assert!(matches!(result, Err(IrError::QubitNotFound { .. })));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut circuit = Circuit::new("test", 2);
        let result = circuit.cx(QubitId(1), QubitId(1));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_arity_mismatch() {
        let mut circuit = Circuit::new("test", 3);
        let result = circuit.apply(Instruction::gate(
            StandardGate::CX,
            [QubitId(0), QubitId(1), QubitId(2)],
        ));
        assert!(matches!(
            result,
            Err(IrError::QubitCountMismatch {
                expected: 2,
                got: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_append_width() {
        let mut small = Circuit::new("small", 1);
        small.x(QubitId(0)).unwrap();
        let mut big = Circuit::new("big", 2);
        big.append(&small).unwrap();
        assert_eq!(big.len(), 1);

        let result = small.append(&big);
        assert!(matches!(
            result,
            Err(IrError::WidthMismatch {
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_inverse_reverses_and_inverts() {
        let mut circuit = Circuit::new("c", 2);
        circuit
            .rx(0.4, QubitId(0))
            .unwrap()
            .rz(PI / 3.0, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let inv = circuit.inverse();
        let gates: Vec<_> = inv.iter().map(|i| i.gate).collect();
        assert_eq!(
            gates,
            vec![StandardGate::CX, StandardGate::Rz(-PI / 3.0), StandardGate::Rx(-0.4)]
        );
        assert_eq!(inv.name(), "c_dg");
    }

    #[test]
    fn test_conjugate_keeps_order() {
        let mut circuit = Circuit::new("c", 2);
        circuit
            .ry(0.3, QubitId(0))
            .unwrap()
            .crx(0.5, QubitId(0), QubitId(1))
            .unwrap()
            .rz(0.7, QubitId(1))
            .unwrap();
        let gates: Vec<_> = circuit.conjugate().iter().map(|i| i.gate).collect();
        assert_eq!(
            gates,
            vec![StandardGate::Ry(0.3), StandardGate::CRx(-0.5), StandardGate::Rz(-0.7)]
        );
    }

    #[test]
    fn test_num_angles() {
        let mut circuit = Circuit::new("c", 1);
        circuit
            .ry(0.1, QubitId(0))
            .unwrap()
            .rx(0.4, QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap()
            .z(QubitId(0))
            .unwrap();
        assert_eq!(circuit.num_angles(), 2);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut circuit = Circuit::new("c", 2);
        circuit.crx(0.25, QubitId(0), QubitId(1)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
