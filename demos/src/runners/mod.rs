//! Scenario runners.
//!
//! Every scenario grows a circuit one layer at a time. After each new layer
//! all parameters restart at zero and are optimized again, until the target
//! is met or the layer budget runs out.

pub mod disentangle;
pub mod entropy;
pub mod reduce;

use std::time::Instant;

use anyhow::Result;
use indicatif::ProgressBar;
use qdr_circuit::{BlockSpec, VariationalCircuit};
use qdr_opt::{OptimizerConfig, VariationalProblem};
use qdr_sim::QuantumState;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use disentangle::{DisentangleResult, DisentangleRunner};
pub use entropy::{EntropyResult, EntropyRunner};
pub use reduce::{ReductionResult, ReductionRunner};

/// Outcome of optimizing a circuit with a given number of layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerReport {
    pub layers: usize,
    /// Best measurement value.
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    /// Wall-clock time of the optimization.
    pub seconds: f64,
}

/// Direction of a scenario's objective and when it counts as reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Push the value up to 1.
    MaximizeToOne,
    /// Push the value down to 0.
    MinimizeToZero,
}

impl Goal {
    pub fn reached(self, value: f64, threshold: f64) -> bool {
        match self {
            Goal::MaximizeToOne => 1.0 - value < threshold,
            Goal::MinimizeToZero => value < threshold,
        }
    }
}

/// Shared settings of one layer-growing run.
#[derive(Debug, Clone)]
pub struct LayerSchedule<'a> {
    pub structure: &'a str,
    pub max_layers: usize,
    pub threshold: f64,
    pub optimizer: &'a OptimizerConfig,
}

/// Add layers to `circuit` until `measure` reaches `goal`.
///
/// The circuit is left holding the parameters of the last run.
pub fn grow_layers<M, Er>(
    circuit: &mut VariationalCircuit,
    input: &QuantumState,
    schedule: &LayerSchedule<'_>,
    goal: Goal,
    mut measure: M,
    progress: &ProgressBar,
) -> Result<Vec<LayerReport>>
where
    M: FnMut(&QuantumState) -> Result<f64, Er>,
    Er: std::error::Error + Send + Sync + 'static,
{
    let mut reports = Vec::with_capacity(schedule.max_layers);
    for layers in 1..=schedule.max_layers {
        circuit.add_block(BlockSpec::new(schedule.structure))?;
        let x0 = vec![0.0; circuit.num_parameters()];
        let start = Instant::now();

        let problem = VariationalProblem::new(&mut *circuit, input, &mut measure);
        let optimum = match goal {
            Goal::MaximizeToOne => problem.maximize(schedule.optimizer, x0)?,
            Goal::MinimizeToZero => problem.minimize(schedule.optimizer, x0)?,
        };

        let report = LayerReport {
            layers,
            value: optimum.value,
            iterations: optimum.iterations,
            evaluations: optimum.evaluations,
            converged: optimum.converged,
            seconds: start.elapsed().as_secs_f64(),
        };
        info!(layers, value = report.value, "Layer optimized");
        progress.inc(1);
        progress.set_message(format!("L={layers} value={:.6}", report.value));
        let done = goal.reached(report.value, schedule.threshold);
        reports.push(report);
        if done {
            break;
        }
    }
    Ok(reports)
}
