//! Optimizing a variational circuit against a measurement function.
//!
//! The objective handed to the minimizer is
//! `x ↦ measure(circuit.update(x).apply_to(input))`, negated when
//! maximizing. Failures inside the loop cannot be returned through the
//! minimizer, so a failing proposal scores `+∞` and the first failure is
//! reported once the minimizer returns.

use qdr_circuit::{CircuitError, VariationalCircuit};
use qdr_sim::{QuantumState, SimulationEngine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{OptError, OptResult};
use crate::optimizer::Optimizer;

/// Outcome of optimizing a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitOptimum {
    /// Best parameters, now loaded into the circuit.
    pub parameters: Vec<f64>,
    /// Measurement value at `parameters`, with the caller's sign.
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    /// Best value after each iteration, with the caller's sign.
    pub history: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    fn sign(self) -> f64 {
        match self {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        }
    }
}

/// A circuit, an input state and a measurement function to optimize.
pub struct VariationalProblem<'a, E: SimulationEngine, M> {
    circuit: &'a mut VariationalCircuit<E>,
    input: &'a QuantumState,
    measure: M,
    blocks: Option<Vec<usize>>,
}

impl<'a, E, M, Er> VariationalProblem<'a, E, M>
where
    E: SimulationEngine,
    M: FnMut(&QuantumState) -> Result<f64, Er>,
    Er: std::error::Error + Send + Sync + 'static,
{
    pub fn new(circuit: &'a mut VariationalCircuit<E>, input: &'a QuantumState, measure: M) -> Self {
        Self {
            circuit,
            input,
            measure,
            blocks: None,
        }
    }

    /// Only vary the listed blocks; the rest keep their parameters.
    #[must_use]
    pub fn with_blocks(mut self, blocks: impl Into<Vec<usize>>) -> Self {
        self.blocks = Some(blocks.into());
        self
    }

    /// Number of parameters the optimizer controls.
    pub fn num_parameters(&self) -> OptResult<usize> {
        match &self.blocks {
            None => Ok(self.circuit.num_parameters()),
            Some(selected) => {
                let len = self.circuit.num_blocks();
                let mut total = 0;
                for (i, &index) in selected.iter().enumerate() {
                    let block = self
                        .circuit
                        .block(index)
                        .ok_or(CircuitError::Index { index, len })?;
                    if selected[..i].contains(&index) {
                        return Err(CircuitError::DuplicateSelector(index).into());
                    }
                    total += block.num_parameters();
                }
                Ok(total)
            }
        }
    }

    /// Minimize the measurement.
    pub fn minimize<O: Optimizer>(self, optimizer: &O, x0: Vec<f64>) -> OptResult<CircuitOptimum> {
        self.run(optimizer, x0, Sense::Minimize)
    }

    /// Maximize the measurement.
    pub fn maximize<O: Optimizer>(self, optimizer: &O, x0: Vec<f64>) -> OptResult<CircuitOptimum> {
        self.run(optimizer, x0, Sense::Maximize)
    }

    #[instrument(skip_all, fields(sense = ?sense, dim = x0.len()))]
    fn run<O: Optimizer>(
        mut self,
        optimizer: &O,
        x0: Vec<f64>,
        sense: Sense,
    ) -> OptResult<CircuitOptimum> {
        let expected = self.num_parameters()?;
        if x0.len() != expected {
            return Err(OptError::DimensionMismatch {
                expected,
                got: x0.len(),
            });
        }
        self.circuit.check_state(self.input)?;

        let sign = sense.sign();
        let mut failure: Option<OptError> = None;
        let result = {
            let circuit = &mut *self.circuit;
            let input = self.input;
            let measure = &mut self.measure;
            let blocks = self.blocks.as_deref();
            optimizer.minimize(
                |x: &[f64]| match evaluate(circuit, input, measure, blocks, x) {
                    Ok(value) if value.is_nan() => {
                        failure.get_or_insert(OptError::NotANumber);
                        f64::INFINITY
                    }
                    Ok(value) => sign * value,
                    Err(err) => {
                        debug!(error = %err, "Proposal failed");
                        failure.get_or_insert(err);
                        f64::INFINITY
                    }
                },
                x0,
            )
        };

        if let Some(err) = failure {
            warn!(error = %err, "Optimization aborted");
            return Err(err);
        }

        load(self.circuit, self.blocks.as_deref(), &result.optimal_params)?;
        let optimum = CircuitOptimum {
            value: sign * result.optimal_value,
            history: result.history.iter().map(|v| sign * v).collect(),
            parameters: result.optimal_params,
            iterations: result.num_iterations,
            evaluations: result.num_evaluations,
            converged: result.converged,
        };
        info!(
            value = optimum.value,
            iterations = optimum.iterations,
            evaluations = optimum.evaluations,
            converged = optimum.converged,
            "Circuit optimized"
        );
        Ok(optimum)
    }
}

fn load<E: SimulationEngine>(
    circuit: &mut VariationalCircuit<E>,
    blocks: Option<&[usize]>,
    x: &[f64],
) -> Result<(), CircuitError> {
    match blocks {
        Some(selected) => circuit.update_selected(x, selected),
        None => circuit.update_parameters(x),
    }
}

fn evaluate<E, M, Er>(
    circuit: &mut VariationalCircuit<E>,
    input: &QuantumState,
    measure: &mut M,
    blocks: Option<&[usize]>,
    x: &[f64],
) -> OptResult<f64>
where
    E: SimulationEngine,
    M: FnMut(&QuantumState) -> Result<f64, Er>,
    Er: std::error::Error + Send + Sync + 'static,
{
    load(circuit, blocks, x)?;
    let output = circuit.apply_to(input)?;
    measure(&output).map_err(|e| OptError::Measurement(Box::new(e)))
}

/// Minimize `measure(circuit(input))` over all circuit parameters.
pub fn circ_minimize<E, M, Er, O>(
    circuit: &mut VariationalCircuit<E>,
    input: &QuantumState,
    measure: M,
    optimizer: &O,
    x0: Vec<f64>,
) -> OptResult<CircuitOptimum>
where
    E: SimulationEngine,
    M: FnMut(&QuantumState) -> Result<f64, Er>,
    Er: std::error::Error + Send + Sync + 'static,
    O: Optimizer,
{
    VariationalProblem::new(circuit, input, measure).minimize(optimizer, x0)
}

/// Maximize `measure(circuit(input))` over all circuit parameters.
pub fn circ_maximize<E, M, Er, O>(
    circuit: &mut VariationalCircuit<E>,
    input: &QuantumState,
    measure: M,
    optimizer: &O,
    x0: Vec<f64>,
) -> OptResult<CircuitOptimum>
where
    E: SimulationEngine,
    M: FnMut(&QuantumState) -> Result<f64, Er>,
    Er: std::error::Error + Send + Sync + 'static,
    O: Optimizer,
{
    VariationalProblem::new(circuit, input, measure).maximize(optimizer, x0)
}
