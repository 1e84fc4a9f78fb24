//! Direct reduction: rotate the trash qubits onto `|0…0⟩`.

use anyhow::Result;
use indicatif::ProgressBar;
use qdr_circuit::VariationalCircuit;
use qdr_measure::{fid_ref, qdr_cost};
use qdr_sim::QuantumState;
use serde::{Deserialize, Serialize};

use super::{Goal, LayerReport, LayerSchedule, grow_layers};
use crate::config::DemoConfig;

/// Result of a reduction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionResult {
    pub qubits: usize,
    pub trash: Vec<usize>,
    /// One entry per layer count tried.
    pub layers: Vec<LayerReport>,
    /// Fidelity between the output and (kept part) ⊗ `|0…0⟩`.
    pub final_fidelity: f64,
    /// `1 − F` of the trash qubits against `|0…0⟩`.
    pub final_cost: f64,
    pub parameters: Vec<f64>,
}

impl ReductionResult {
    pub fn reached(&self, threshold: f64) -> bool {
        self.layers
            .last()
            .is_some_and(|l| Goal::MaximizeToOne.reached(l.value, threshold))
    }
}

/// Reduction scenario runner.
pub struct ReductionRunner {
    pub config: DemoConfig,
}

impl ReductionRunner {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    /// Run on the configured random input.
    pub fn run(&self, progress: &ProgressBar) -> Result<ReductionResult> {
        let input = self.config.input_state()?;
        self.run_on(&input, progress)
    }

    /// Run on a given input.
    pub fn run_on(&self, input: &QuantumState, progress: &ProgressBar) -> Result<ReductionResult> {
        let config = &self.config;
        let trash = config.trash();
        let reference = QuantumState::zero(config.reduced)?;

        let mut circuit = VariationalCircuit::new(u32::try_from(config.qubits)?)?;
        let schedule = LayerSchedule {
            structure: &config.structure,
            max_layers: config.max_layers,
            threshold: config.threshold,
            optimizer: &config.optimizer,
        };
        let layers = grow_layers(
            &mut circuit,
            input,
            &schedule,
            Goal::MaximizeToOne,
            |s: &QuantumState| fid_ref(s, &reference, Some(&trash)),
            progress,
        )?;

        let out = circuit.apply_to(input)?;
        let kept = QuantumState::Density(out.reduced(&config.kept())?);
        let target = kept.tensor(&reference)?;
        let final_fidelity = fid_ref(&out, &target, None)?;
        let final_cost = qdr_cost(input, &reference, circuit.gate_sequence()?, &trash)?;

        Ok(ReductionResult {
            qubits: config.qubits,
            trash,
            layers,
            final_fidelity,
            final_cost,
            parameters: circuit.parameters(),
        })
    }
}
