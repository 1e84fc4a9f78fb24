//! Two-phase reduction.
//!
//! Phase one maximizes the separable purity over the kept/trash split, so the
//! output is (close to) a product state. Phase two takes the reduced trash
//! state alone and compresses it to `|0…0⟩` with a circuit on the trash
//! qubits only.

use anyhow::Result;
use indicatif::ProgressBar;
use qdr_circuit::VariationalCircuit;
use qdr_measure::{fid_ref, ptest, sep_purity};
use qdr_sim::QuantumState;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Goal, LayerReport, LayerSchedule, grow_layers};
use crate::config::DemoConfig;

/// Result of a disentangling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisentangleResult {
    pub qubits: usize,
    pub trash: Vec<usize>,
    /// Separable purity per layer count.
    pub disentangle_layers: Vec<LayerReport>,
    /// Trash-state fidelity with `|0…0⟩` per layer count.
    pub compress_layers: Vec<LayerReport>,
    /// Input purity minus the separable purity left after phase one.
    pub purity_loss: f64,
    pub final_fidelity: f64,
}

/// Disentangling scenario runner.
pub struct DisentangleRunner {
    pub config: DemoConfig,
}

impl DisentangleRunner {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    /// Run on the configured random input.
    pub fn run(&self, progress: &ProgressBar) -> Result<DisentangleResult> {
        let input = self.config.input_state()?;
        self.run_on(&input, progress)
    }

    /// Run on a given input.
    pub fn run_on(
        &self,
        input: &QuantumState,
        progress: &ProgressBar,
    ) -> Result<DisentangleResult> {
        let config = &self.config;
        let kept = config.kept();
        let trash = config.trash();
        let partitions = vec![kept.clone(), trash.clone()];
        let schedule = LayerSchedule {
            structure: &config.structure,
            max_layers: config.max_layers,
            threshold: config.threshold,
            optimizer: &config.optimizer,
        };

        let mut full = VariationalCircuit::new(u32::try_from(config.qubits)?)?;
        let disentangle_layers = grow_layers(
            &mut full,
            input,
            &schedule,
            Goal::MaximizeToOne,
            |s: &QuantumState| sep_purity(s, Some(&partitions)),
            progress,
        )?;
        let out = full.apply_to(input)?;
        let purity_loss = ptest(input, full.gate_sequence()?, Some(&partitions))?;
        let trash_state = QuantumState::Density(out.reduced(&trash)?);
        debug!(purity = trash_state.purity(), "Trash state after disentangling");

        let reference = QuantumState::zero(config.reduced)?;
        let mut small = VariationalCircuit::new(u32::try_from(config.reduced)?)?;
        let compress_layers = grow_layers(
            &mut small,
            &trash_state,
            &schedule,
            Goal::MaximizeToOne,
            |s: &QuantumState| fid_ref(s, &reference, None),
            progress,
        )?;
        let compressed = small.apply_to(&trash_state)?;

        let kept_state = QuantumState::Density(out.reduced(&kept)?);
        let final_state = kept_state.tensor(&compressed)?;
        let target = kept_state.tensor(&reference)?;
        let final_fidelity = fid_ref(&final_state, &target, None)?;

        Ok(DisentangleResult {
            qubits: config.qubits,
            trash,
            disentangle_layers,
            compress_layers,
            purity_loss,
            final_fidelity,
        })
    }
}
