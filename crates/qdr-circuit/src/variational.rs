//! The composed variational circuit.
//!
//! A [`VariationalCircuit`] is an ordered list of [`Ansatz`] blocks on a fixed
//! register. Optimizers see it as a function of one flat parameter vector;
//! [`VariationalCircuit::update_parameters`] slices that vector into the
//! blocks in order, and [`VariationalCircuit::update_selected`] does the same
//! for a chosen subset of blocks.
//!
//! The composed gate sequence and its operator are cached. Adding, inserting,
//! moving or removing a block and every parameter update drop the cache; the
//! next [`compile`](VariationalCircuit::compile) or
//! [`apply_to`](VariationalCircuit::apply_to) rebuilds it.
//!
//! # Example
//!
//! ```rust
//! use qdr_circuit::{BlockSpec, VariationalCircuit};
//! use qdr_sim::QuantumState;
//!
//! let mut circuit = VariationalCircuit::new(4).unwrap();
//! circuit.add_block(BlockSpec::new("regular")).unwrap();
//! circuit
//!     .add_block(BlockSpec::new("local").with_positions([2, 3]))
//!     .unwrap();
//! assert_eq!(circuit.num_parameters(), 12 + 6);
//!
//! let flat: Vec<f64> = (0..18).map(|i| 0.1 * i as f64).collect();
//! circuit.update_parameters(&flat).unwrap();
//! assert_eq!(circuit.parameters(), flat);
//!
//! let out = circuit.apply_to(&QuantumState::zero(4).unwrap()).unwrap();
//! assert_eq!(out.num_qubits(), 4);
//! ```

use std::ops::Range;
use std::sync::Arc;

use qdr_ir::Circuit;
use qdr_sim::{DenseEngine, MAX_DENSE_QUBITS, QuantumState, SimError, SimulationEngine, Unitary};
use tracing::debug;

use crate::ansatz::Ansatz;
use crate::error::{CircuitError, CircuitResult, PlacementIssue, StateIssue};
use crate::registry::{StructureRegistry, builtin_registry};

/// Description of a block to add.
///
/// Without explicit parameters the block starts at all zeros. Without a
/// qubit count the block is as wide as its positions, or as the whole
/// circuit when no positions are given either.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    structure: String,
    parameters: Option<Vec<f64>>,
    num_qubits: Option<u32>,
    positions: Option<Vec<u32>>,
}

impl BlockSpec {
    /// A block of the named structure.
    pub fn new(structure: impl Into<String>) -> Self {
        Self {
            structure: structure.into(),
            parameters: None,
            num_qubits: None,
            positions: None,
        }
    }

    /// Set the initial parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl Into<Vec<f64>>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    /// Set the block width.
    #[must_use]
    pub fn with_qubits(mut self, num_qubits: u32) -> Self {
        self.num_qubits = Some(num_qubits);
        self
    }

    /// Place the block on these parent qubits.
    #[must_use]
    pub fn with_positions(mut self, positions: impl Into<Vec<u32>>) -> Self {
        self.positions = Some(positions.into());
        self
    }

    pub fn structure(&self) -> &str {
        &self.structure
    }
}

/// Which blocks [`VariationalCircuit::remove_block`] removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSelector {
    /// One block by position.
    Index(usize),
    /// A contiguous run of blocks.
    Range(Range<usize>),
    /// Blocks built from the named structure.
    Structure {
        name: String,
        policy: RemovePolicy,
    },
}

impl BlockSelector {
    /// Match blocks by structure name.
    pub fn structure(name: impl Into<String>, policy: RemovePolicy) -> Self {
        BlockSelector::Structure {
            name: name.into(),
            policy,
        }
    }
}

/// Which of several name matches to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovePolicy {
    #[default]
    First,
    Last,
    All,
}

/// New parameter values, either flat or one array per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterUpdate<'a> {
    /// One contiguous vector, sliced by block sizes.
    Flat(&'a [f64]),
    /// One array per targeted block.
    PerBlock(&'a [Vec<f64>]),
}

impl<'a> From<&'a [f64]> for ParameterUpdate<'a> {
    fn from(values: &'a [f64]) -> Self {
        ParameterUpdate::Flat(values)
    }
}

impl<'a> From<&'a Vec<f64>> for ParameterUpdate<'a> {
    fn from(values: &'a Vec<f64>) -> Self {
        ParameterUpdate::Flat(values)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for ParameterUpdate<'a> {
    fn from(values: &'a [f64; N]) -> Self {
        ParameterUpdate::Flat(values)
    }
}

impl<'a> From<&'a [Vec<f64>]> for ParameterUpdate<'a> {
    fn from(values: &'a [Vec<f64>]) -> Self {
        ParameterUpdate::PerBlock(values)
    }
}

impl<'a> From<&'a Vec<Vec<f64>>> for ParameterUpdate<'a> {
    fn from(values: &'a Vec<Vec<f64>>) -> Self {
        ParameterUpdate::PerBlock(values)
    }
}

/// The cached composition of all blocks.
#[derive(Debug, Clone)]
pub struct CompiledCircuit {
    circuit: Circuit,
    unitary: Option<Unitary>,
}

impl CompiledCircuit {
    /// Gate sequence in parent indices.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Operator of the gate sequence. Not built for registers wider than
    /// [`MAX_DENSE_QUBITS`].
    pub fn unitary(&self) -> Option<&Unitary> {
        self.unitary.as_ref()
    }
}

/// Ordered parameterized blocks on a fixed register.
#[derive(Debug, Clone)]
pub struct VariationalCircuit<E: SimulationEngine = DenseEngine> {
    num_qubits: u32,
    blocks: Vec<Ansatz>,
    registry: Arc<StructureRegistry>,
    engine: E,
    cache: Option<CompiledCircuit>,
    input_state: Option<Arc<QuantumState>>,
    output_state: Option<Arc<QuantumState>>,
}

impl VariationalCircuit<DenseEngine> {
    /// Empty circuit on `num_qubits` qubits with the built-in structures and
    /// the dense engine.
    pub fn new(num_qubits: u32) -> CircuitResult<Self> {
        Self::with_engine(num_qubits, DenseEngine)
    }
}

impl<E: SimulationEngine> VariationalCircuit<E> {
    /// Empty circuit using a custom simulation engine.
    pub fn with_engine(num_qubits: u32, engine: E) -> CircuitResult<Self> {
        if num_qubits == 0 {
            return Err(CircuitError::ZeroQubits);
        }
        Ok(Self {
            num_qubits,
            blocks: vec![],
            registry: builtin_registry(),
            engine,
            cache: None,
            input_state: None,
            output_state: None,
        })
    }

    /// Resolve structure names against a custom registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<StructureRegistry>) -> Self {
        self.registry = registry;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn blocks(&self) -> &[Ansatz] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Ansatz> {
        self.blocks.get(index)
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Whether the composed sequence and operator are up to date.
    pub fn is_compiled(&self) -> bool {
        self.cache.is_some()
    }

    /// Input recorded by [`add_input`](Self::add_input) or
    /// [`apply_recording`](Self::apply_recording).
    pub fn input_state(&self) -> Option<&Arc<QuantumState>> {
        self.input_state.as_ref()
    }

    /// Output recorded by the last recording application.
    pub fn output_state(&self) -> Option<&Arc<QuantumState>> {
        self.output_state.as_ref()
    }

    /// Total parameter count across all blocks.
    pub fn num_parameters(&self) -> usize {
        self.blocks.iter().map(Ansatz::num_parameters).sum()
    }

    /// All block parameters concatenated in block order.
    pub fn parameters(&self) -> Vec<f64> {
        self.blocks
            .iter()
            .flat_map(|b| b.parameters().iter().copied())
            .collect()
    }

    /// The slice of the flat vector owned by each block.
    pub fn parameter_ranges(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.blocks
            .iter()
            .map(|b| {
                let range = start..start + b.num_parameters();
                start = range.end;
                range
            })
            .collect()
    }

    // =========================================================================
    // Block management
    // =========================================================================

    /// Append a block. Returns its index.
    pub fn add_block(&mut self, spec: BlockSpec) -> CircuitResult<usize> {
        let block = self.make_block(spec)?;
        self.blocks.push(block);
        self.invalidate();
        debug!(
            structure = self.blocks[self.blocks.len() - 1].name(),
            blocks = self.blocks.len(),
            "Added block"
        );
        Ok(self.blocks.len() - 1)
    }

    /// Insert a block before position `at` (`at == num_blocks()` appends).
    pub fn insert_block(&mut self, at: usize, spec: BlockSpec) -> CircuitResult<()> {
        if at > self.blocks.len() {
            return Err(CircuitError::Index {
                index: at,
                len: self.blocks.len(),
            });
        }
        let block = self.make_block(spec)?;
        debug!(structure = block.name(), at, "Inserted block");
        self.blocks.insert(at, block);
        self.invalidate();
        Ok(())
    }

    /// Move the block at `from` so that it ends up at index `to`.
    pub fn move_block(&mut self, from: usize, to: usize) -> CircuitResult<()> {
        let len = self.blocks.len();
        for index in [from, to] {
            if index >= len {
                return Err(CircuitError::Index { index, len });
            }
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.invalidate();
        Ok(())
    }

    /// Remove the selected blocks and return them in their former order.
    ///
    /// A structure selector with no match removes nothing. Matching indices
    /// are collected before anything is removed.
    pub fn remove_block(&mut self, selector: &BlockSelector) -> CircuitResult<Vec<Ansatz>> {
        let len = self.blocks.len();
        let indices: Vec<usize> = match selector {
            BlockSelector::Index(index) => {
                if *index >= len {
                    return Err(CircuitError::Index { index: *index, len });
                }
                vec![*index]
            }
            BlockSelector::Range(range) => {
                if range.start > range.end || range.end > len {
                    return Err(CircuitError::Index {
                        index: range.end.max(range.start),
                        len,
                    });
                }
                range.clone().collect()
            }
            BlockSelector::Structure { name, policy } => {
                let mut matches = self
                    .blocks
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.name() == name)
                    .map(|(i, _)| i);
                match policy {
                    RemovePolicy::First => matches.next().into_iter().collect(),
                    RemovePolicy::Last => matches.last().into_iter().collect(),
                    RemovePolicy::All => matches.collect(),
                }
            }
        };

        let mut removed: Vec<Ansatz> = indices
            .iter()
            .rev()
            .map(|&i| self.blocks.remove(i))
            .collect();
        removed.reverse();
        self.invalidate();
        debug!(
            removed = removed.len(),
            remaining = self.blocks.len(),
            "Removed blocks"
        );
        Ok(removed)
    }

    fn make_block(&self, spec: BlockSpec) -> CircuitResult<Ansatz> {
        let structure = self.registry.get(&spec.structure)?.clone();
        let num_qubits = spec
            .num_qubits
            .or_else(|| {
                spec.positions
                    .as_ref()
                    .map(|p| u32::try_from(p.len()).unwrap_or(u32::MAX))
            })
            .unwrap_or(self.num_qubits);
        if spec.positions.is_none() && num_qubits != self.num_qubits {
            return Err(PlacementIssue::MissingPositions {
                block_qubits: num_qubits,
                circuit_qubits: self.num_qubits,
            }
            .into());
        }
        let parameters = spec
            .parameters
            .unwrap_or_else(|| vec![0.0; structure.param_count(num_qubits)]);
        let block = Ansatz::new(structure, parameters, num_qubits, spec.positions)?;
        block.check_fits(self.num_qubits)?;
        Ok(block)
    }

    // =========================================================================
    // Parameter updates
    // =========================================================================

    /// Update every block, in order.
    ///
    /// A flat vector must have exactly [`num_parameters`](Self::num_parameters)
    /// entries; a per-block list must have one correctly sized array per
    /// block. On error nothing changes.
    pub fn update_parameters<'a>(
        &mut self,
        values: impl Into<ParameterUpdate<'a>>,
    ) -> CircuitResult<()> {
        let all: Vec<usize> = (0..self.blocks.len()).collect();
        self.apply_update(values.into(), &all)
    }

    /// Update only the listed blocks, consuming values in selector order.
    ///
    /// Unlisted blocks keep their parameters bit for bit.
    pub fn update_selected<'a>(
        &mut self,
        values: impl Into<ParameterUpdate<'a>>,
        blocks: &[usize],
    ) -> CircuitResult<()> {
        self.apply_update(values.into(), blocks)
    }

    fn apply_update(&mut self, values: ParameterUpdate<'_>, targets: &[usize]) -> CircuitResult<()> {
        let chunks = self.plan_update(values, targets)?;
        for (&index, chunk) in targets.iter().zip(chunks) {
            self.blocks[index].update(chunk)?;
        }
        self.invalidate();
        debug!(
            blocks = targets.len(),
            parameters = self.num_parameters(),
            "Updated parameters"
        );
        Ok(())
    }

    /// Validate an update and split it into one slice per target.
    fn plan_update<'v>(
        &self,
        values: ParameterUpdate<'v>,
        targets: &[usize],
    ) -> CircuitResult<Vec<&'v [f64]>> {
        let len = self.blocks.len();
        for (i, &index) in targets.iter().enumerate() {
            if index >= len {
                return Err(CircuitError::Index { index, len });
            }
            if targets[..i].contains(&index) {
                return Err(CircuitError::DuplicateSelector(index));
            }
        }

        match values {
            ParameterUpdate::Flat(flat) => {
                let expected: usize = targets
                    .iter()
                    .map(|&i| self.blocks[i].num_parameters())
                    .sum();
                if flat.len() != expected {
                    return Err(CircuitError::ParameterCount {
                        expected,
                        got: flat.len(),
                    });
                }
                let mut rest = flat;
                Ok(targets
                    .iter()
                    .map(|&i| {
                        let (chunk, tail) = rest.split_at(self.blocks[i].num_parameters());
                        rest = tail;
                        chunk
                    })
                    .collect())
            }
            ParameterUpdate::PerBlock(arrays) => {
                if arrays.len() != targets.len() {
                    return Err(CircuitError::BlockCount {
                        expected: targets.len(),
                        got: arrays.len(),
                    });
                }
                for (&i, array) in targets.iter().zip(arrays) {
                    let block = &self.blocks[i];
                    block.structure().check_shape(array, block.num_qubits())?;
                }
                Ok(arrays.iter().map(Vec::as_slice).collect())
            }
        }
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }

    // =========================================================================
    // Compilation and application
    // =========================================================================

    /// The composed gate sequence and its operator, rebuilt if stale.
    pub fn compile(&mut self) -> CircuitResult<&CompiledCircuit> {
        ensure_compiled(&mut self.cache, &mut self.blocks, &self.engine, self.num_qubits)
    }

    /// The composed gate sequence in parent indices.
    pub fn gate_sequence(&mut self) -> CircuitResult<&Circuit> {
        Ok(self.compile()?.circuit())
    }

    /// The composed operator. Fails with `TooManyQubits` above
    /// [`MAX_DENSE_QUBITS`].
    pub fn unitary(&mut self) -> CircuitResult<&Unitary> {
        let requested = self.num_qubits as usize;
        self.compile()?.unitary().ok_or(CircuitError::Sim(SimError::TooManyQubits {
            requested,
            max: MAX_DENSE_QUBITS,
        }))
    }

    /// Evolve a state through the circuit. Recorded states are untouched.
    ///
    /// Up to [`MAX_DENSE_QUBITS`] the cached operator is applied. Wider kets
    /// and bras run through the gate sequence one gate at a time.
    pub fn apply_to(&mut self, state: &QuantumState) -> CircuitResult<QuantumState> {
        self.check_state(state)?;
        let compiled =
            ensure_compiled(&mut self.cache, &mut self.blocks, &self.engine, self.num_qubits)?;
        let out = match &compiled.unitary {
            Some(unitary) => self.engine.evolve(unitary, state)?,
            None => self.engine.simulate(&compiled.circuit, state)?,
        };
        Ok(out)
    }

    /// Evolve a state and record it as the default input, and the result as
    /// the default output.
    pub fn apply_recording(
        &mut self,
        state: Arc<QuantumState>,
    ) -> CircuitResult<Arc<QuantumState>> {
        let output = Arc::new(self.apply_to(&state)?);
        self.input_state = Some(state);
        self.output_state = Some(Arc::clone(&output));
        Ok(output)
    }

    /// Record a default input state. Any recorded output is dropped.
    pub fn add_input(&mut self, state: Arc<QuantumState>) -> CircuitResult<()> {
        self.check_state(&state)?;
        self.input_state = Some(state);
        self.output_state = None;
        Ok(())
    }

    /// Evolve the recorded input and record the result.
    pub fn apply_to_input(&mut self) -> CircuitResult<Arc<QuantumState>> {
        let input = self.input_state.clone().ok_or(CircuitError::MissingInput)?;
        self.apply_recording(input)
    }

    /// The inverse gate sequence: blocks in reverse order, each inverted.
    pub fn adjoint(&mut self) -> CircuitResult<Circuit> {
        let mut circuit = Circuit::new("variational_dg", self.num_qubits);
        for block in self.blocks.iter_mut().rev() {
            circuit.extend(block.adjoint()?)?;
        }
        Ok(circuit)
    }

    /// Check that a state can be fed to this circuit.
    pub fn check_state(&self, state: &QuantumState) -> CircuitResult<()> {
        let expected = self.num_qubits as usize;
        let issue = if state.num_qubits() != expected {
            StateIssue::Width {
                expected,
                got: state.num_qubits(),
            }
        } else if state.validate().is_err() {
            StateIssue::NonFinite
        } else {
            return Ok(());
        };
        Err(CircuitError::InvalidState {
            kind: state.kind(),
            issue,
        })
    }
}

fn ensure_compiled<'c, E: SimulationEngine>(
    cache: &'c mut Option<CompiledCircuit>,
    blocks: &mut [Ansatz],
    engine: &E,
    num_qubits: u32,
) -> CircuitResult<&'c CompiledCircuit> {
    let compiled = match cache.take() {
        Some(compiled) => compiled,
        None => {
            let mut circuit = Circuit::new("variational", num_qubits);
            for block in blocks.iter_mut() {
                circuit.extend(block.placed()?)?;
            }
            let unitary = if num_qubits as usize <= MAX_DENSE_QUBITS {
                Some(engine.compile(&circuit)?)
            } else {
                None
            };
            debug!(
                engine = engine.name(),
                blocks = blocks.len(),
                gates = circuit.len(),
                depth = circuit.depth(),
                dense = unitary.is_some(),
                "Compiled variational circuit"
            );
            CompiledCircuit { circuit, unitary }
        }
    };
    let compiled: &CompiledCircuit = cache.insert(compiled);
    Ok(compiled)
}
