//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// A gate applied to concrete qubits.
///
/// For controlled gates the control qubit comes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate.
    pub gate: StandardGate,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Get the name of the gate.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }

    /// Check if this instruction operates on a given qubit.
    pub fn operates_on(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }

    /// Rewrite the operands through a placement map.
    ///
    /// Local qubit `q` becomes `positions[q]`. Control and target are mapped
    /// the same way, so the gate's semantics are unchanged.
    pub fn remap(&self, positions: &[u32]) -> IrResult<Self> {
        let qubits = self
            .qubits
            .iter()
            .map(|q| {
                positions
                    .get(q.index())
                    .map(|&p| QubitId(p))
                    .ok_or_else(|| IrError::QubitNotFound {
                        qubit: *q,
                        num_qubits: u32::try_from(positions.len()).unwrap_or(u32::MAX),
                        gate_name: Some(self.name().to_string()),
                    })
            })
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self {
            gate: self.gate,
            qubits,
        })
    }

    /// The complex conjugate of this instruction on the same operands.
    pub fn conjugate(&self) -> Self {
        Self {
            gate: self.gate.conjugate(),
            qubits: self.qubits.clone(),
        }
    }

    /// The adjoint of this instruction on the same operands.
    pub fn inverse(&self) -> Self {
        Self {
            gate: self.gate.inverse(),
            qubits: self.qubits.clone(),
        }
    }
}
