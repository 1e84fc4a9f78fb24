//! Demo configuration: file loading, CLI overrides and the random input.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use qdr_opt::{Method, OptimizerConfig};
use qdr_sim::QuantumState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

fn default_qubits() -> usize {
    4
}

fn default_reduced() -> usize {
    2
}

fn default_max_layers() -> usize {
    4
}

fn default_structure() -> String {
    "regular".to_string()
}

fn default_threshold() -> f64 {
    1e-5
}

fn default_seed() -> u64 {
    42
}

/// Everything a scenario needs besides the input state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Width of the input state.
    #[serde(default = "default_qubits")]
    pub qubits: usize,
    /// Number of trailing qubits to free up.
    #[serde(default = "default_reduced")]
    pub reduced: usize,
    /// Layers to try before giving up.
    #[serde(default = "default_max_layers")]
    pub max_layers: usize,
    /// Structure of every layer.
    #[serde(default = "default_structure")]
    pub structure: String,
    /// Distance from the ideal value at which a scenario stops adding layers.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Seed of the random input state.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Weight of a second random ket mixed into the input; 0 keeps it pure.
    #[serde(default)]
    pub mixing: f64,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            qubits: default_qubits(),
            reduced: default_reduced(),
            max_layers: default_max_layers(),
            structure: default_structure(),
            threshold: default_threshold(),
            seed: default_seed(),
            mixing: 0.0,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load from YAML (`.yaml`, `.yml`) or JSON (anything else).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let config = if is_yaml {
            serde_yaml_ng::from_str(&text)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        };
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.qubits < 2 {
            bail!("need at least 2 qubits, got {}", self.qubits);
        }
        if self.reduced == 0 || self.reduced >= self.qubits {
            bail!(
                "reduced qubits must be between 1 and {}, got {}",
                self.qubits - 1,
                self.reduced
            );
        }
        if self.max_layers == 0 {
            bail!("max_layers must be positive");
        }
        if !(0.0..=1.0).contains(&self.mixing) {
            bail!("mixing must lie in [0, 1], got {}", self.mixing);
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            bail!("threshold must be positive, got {}", self.threshold);
        }
        self.optimizer.validate()?;
        Ok(())
    }

    /// Qubits that carry the compressed state.
    pub fn kept(&self) -> Vec<usize> {
        (0..self.qubits - self.reduced).collect()
    }

    /// Qubits that are freed up.
    pub fn trash(&self) -> Vec<usize> {
        (self.qubits - self.reduced..self.qubits).collect()
    }

    /// Seeded random input, optionally mixed with a second random ket.
    pub fn input_state(&self) -> Result<QuantumState> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let psi = QuantumState::random_ket(self.qubits, &mut rng)?;
        if self.mixing == 0.0 {
            return Ok(psi);
        }
        let phi = QuantumState::random_ket(self.qubits, &mut rng)?;
        let a = psi.to_density()?;
        let b = phi.to_density()?;
        let keep = 1.0 - self.mixing;
        let mixed = a.matrix().mapv(|z| z * keep) + b.matrix().mapv(|z| z * self.mixing);
        Ok(QuantumState::density(mixed)?)
    }
}

/// Flags shared by every demo binary.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Number of qubits of the input state
    #[arg(short = 'n', long)]
    pub qubits: Option<usize>,

    /// Number of qubits to free up
    #[arg(short, long)]
    pub reduced: Option<usize>,

    /// Maximum number of circuit layers
    #[arg(short = 'L', long)]
    pub max_layers: Option<usize>,

    /// Optimization method (nelder-mead, powell, spsa)
    #[arg(short, long)]
    pub method: Option<Method>,

    /// Maximum iterations per optimization
    #[arg(long)]
    pub maxiter: Option<usize>,

    /// Seed of the random input state
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// YAML or JSON configuration file
    #[arg(short, long, env = "QDR_DEMO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the report as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// The configuration file (or defaults) with flags applied on top.
    pub fn resolve(&self) -> Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        if let Some(qubits) = self.qubits {
            config.qubits = qubits;
        }
        if let Some(reduced) = self.reduced {
            config.reduced = reduced;
        }
        if let Some(max_layers) = self.max_layers {
            config.max_layers = max_layers;
        }
        if let Some(method) = self.method {
            config.optimizer.method = method;
        }
        if let Some(maxiter) = self.maxiter {
            config.optimizer.maxiter = maxiter;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }

    /// Write `report` as pretty JSON if `--output` was given.
    pub fn write_report<T: Serialize>(&self, report: &T) -> Result<()> {
        if let Some(path) = &self.output {
            let json = serde_json::to_string_pretty(report)?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_split() {
        let config = DemoConfig::default();
        assert_eq!(config.kept(), vec![0, 1]);
        assert_eq!(config.trash(), vec![2, 3]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_full_reduction() {
        let config = DemoConfig {
            reduced: 4,
            ..DemoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flags_override_file_defaults() {
        let args = CommonArgs {
            qubits: Some(3),
            reduced: Some(1),
            method: Some(Method::NelderMead),
            ..CommonArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.qubits, 3);
        assert_eq!(config.trash(), vec![2]);
        assert_eq!(config.optimizer.method, Method::NelderMead);
    }

    #[test]
    fn test_input_is_seeded() {
        let config = DemoConfig::default();
        let a = config.input_state().unwrap();
        let b = config.input_state().unwrap();
        assert_eq!(a.probabilities(), b.probabilities());
    }

    #[test]
    fn test_mixed_input_has_lower_purity() {
        let config = DemoConfig {
            mixing: 0.3,
            ..DemoConfig::default()
        };
        let state = config.input_state().unwrap();
        assert!(state.purity() < 1.0 - 1e-3);
    }
}
