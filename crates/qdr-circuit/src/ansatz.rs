//! A single parameterized block and its placement.

use qdr_ir::{Circuit, Instruction};
use tracing::trace;

use crate::error::{CircuitError, CircuitResult, PlacementIssue};
use crate::registry::Structure;

/// One parameterized circuit block.
///
/// The block is built in local qubit indices `0..num_qubits` and embedded in
/// its parent through `positions`: local qubit `q` lands on parent qubit
/// `positions[q]`.
#[derive(Debug, Clone)]
pub struct Ansatz {
    structure: Structure,
    num_qubits: u32,
    positions: Vec<u32>,
    parameters: Vec<f64>,
    /// Local gate sequence for the current parameters.
    compiled: Option<Circuit>,
}

impl Ansatz {
    /// Create a block.
    ///
    /// `positions = None` is the identity placement. Fails with
    /// [`CircuitError::Shape`] if the parameter count is wrong for the
    /// structure, and with [`CircuitError::Placement`] if `positions` has the
    /// wrong length or repeats a qubit.
    pub fn new(
        structure: Structure,
        parameters: Vec<f64>,
        num_qubits: u32,
        positions: Option<Vec<u32>>,
    ) -> CircuitResult<Self> {
        if num_qubits == 0 {
            return Err(CircuitError::ZeroQubits);
        }
        structure.check_shape(&parameters, num_qubits)?;
        let positions = positions.unwrap_or_else(|| (0..num_qubits).collect());
        validate_positions(&positions, num_qubits)?;
        Ok(Self {
            structure,
            num_qubits,
            positions,
            parameters,
            compiled: None,
        })
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Name of the structure this block was built from.
    pub fn name(&self) -> &str {
        self.structure.name()
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the local gate sequence is cached.
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Local gate sequence for the current parameters.
    ///
    /// Built on first call and cached until the next [`update`](Self::update).
    pub fn compile(&mut self) -> CircuitResult<&Circuit> {
        let circuit = match self.compiled.take() {
            Some(circuit) => circuit,
            None => self.build()?,
        };
        let circuit: &Circuit = self.compiled.insert(circuit);
        Ok(circuit)
    }

    fn build(&self) -> CircuitResult<Circuit> {
        trace!(
            structure = self.name(),
            qubits = self.num_qubits,
            "Building block gates"
        );
        self.structure.build(&self.parameters, self.num_qubits)
    }

    /// Replace all parameters.
    ///
    /// Fails with [`CircuitError::Shape`] on a length mismatch, leaving the
    /// block unchanged.
    pub fn update(&mut self, parameters: &[f64]) -> CircuitResult<()> {
        self.structure.check_shape(parameters, self.num_qubits)?;
        self.parameters.clear();
        self.parameters.extend_from_slice(parameters);
        self.compiled = None;
        Ok(())
    }

    /// The local gate sequence rewritten into parent indices.
    ///
    /// Gate order and gate types are kept; every operand, control and target
    /// alike, goes through the same map.
    pub fn remap(&mut self, positions: &[u32]) -> CircuitResult<Vec<Instruction>> {
        validate_positions(positions, self.num_qubits)?;
        let local = self.compile()?;
        Ok(local
            .iter()
            .map(|inst| inst.remap(positions))
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// The block's gates at its own positions.
    pub fn placed(&mut self) -> CircuitResult<Vec<Instruction>> {
        let positions = self.positions.clone();
        self.remap(&positions)
    }

    /// Inverse of [`placed`](Self::placed): reversed order, each gate inverted.
    pub fn adjoint(&mut self) -> CircuitResult<Vec<Instruction>> {
        Ok(self
            .placed()?
            .iter()
            .rev()
            .map(Instruction::inverse)
            .collect())
    }

    /// Check every position against the parent width.
    pub(crate) fn check_fits(&self, parent_qubits: u32) -> CircuitResult<()> {
        if let Some(&position) = self.positions.iter().find(|&&p| p >= parent_qubits) {
            return Err(PlacementIssue::OutOfRange {
                position,
                num_qubits: parent_qubits,
            }
            .into());
        }
        Ok(())
    }
}

fn validate_positions(positions: &[u32], num_qubits: u32) -> Result<(), PlacementIssue> {
    if positions.len() != num_qubits as usize {
        return Err(PlacementIssue::WrongLength {
            expected: num_qubits as usize,
            got: positions.len(),
        });
    }
    for (i, p) in positions.iter().enumerate() {
        if positions[..i].contains(p) {
            return Err(PlacementIssue::Duplicate(*p));
        }
    }
    Ok(())
}
