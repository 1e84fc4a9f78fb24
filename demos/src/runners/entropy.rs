//! Reduction with a classical memory.
//!
//! Minimising the basis entropy of the trash qubits pushes them towards a
//! single computational basis state, which a classical register can record
//! instead of a quantum one.

use anyhow::Result;
use indicatif::ProgressBar;
use qdr_circuit::VariationalCircuit;
use qdr_measure::{c_entropy, fid_ref};
use qdr_sim::QuantumState;
use serde::{Deserialize, Serialize};

use super::{Goal, LayerReport, LayerSchedule, grow_layers};
use crate::config::DemoConfig;

/// Result of an entropy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyResult {
    pub qubits: usize,
    pub trash: Vec<usize>,
    pub layers: Vec<LayerReport>,
    /// Basis distribution of the trash qubits after the circuit.
    pub memory_distribution: Vec<f64>,
    /// Most likely trash basis state.
    pub memory_state: usize,
    /// Fidelity between the output and (kept part) ⊗ (trash part).
    pub final_fidelity: f64,
}

/// Entropy scenario runner.
pub struct EntropyRunner {
    pub config: DemoConfig,
}

impl EntropyRunner {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    /// Run on the configured random input.
    pub fn run(&self, progress: &ProgressBar) -> Result<EntropyResult> {
        let input = self.config.input_state()?;
        self.run_on(&input, progress)
    }

    /// Run on a given input.
    pub fn run_on(&self, input: &QuantumState, progress: &ProgressBar) -> Result<EntropyResult> {
        let config = &self.config;
        let trash = config.trash();
        let schedule = LayerSchedule {
            structure: &config.structure,
            max_layers: config.max_layers,
            threshold: config.threshold,
            optimizer: &config.optimizer,
        };

        let mut circuit = VariationalCircuit::new(u32::try_from(config.qubits)?)?;
        let layers = grow_layers(
            &mut circuit,
            input,
            &schedule,
            Goal::MinimizeToZero,
            |s: &QuantumState| c_entropy(s, Some(&trash)),
            progress,
        )?;

        let out = circuit.apply_to(input)?;
        let memory = QuantumState::Density(out.reduced(&trash)?);
        let memory_distribution = memory.probabilities();
        let memory_state = memory_distribution
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i);

        let kept = QuantumState::Density(out.reduced(&config.kept())?);
        let target = kept.tensor(&memory)?;
        let final_fidelity = fid_ref(&out, &target, None)?;

        Ok(EntropyResult {
            qubits: config.qubits,
            trash,
            layers,
            memory_distribution,
            memory_state,
            final_fidelity,
        })
    }
}
