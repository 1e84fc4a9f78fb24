//! Runtime selection of a minimizer.
//!
//! [`OptimizerConfig`] is the serde-facing description of a run. It
//! implements [`Optimizer`] itself by building the chosen minimizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OptError, OptResult};
use crate::nelder_mead::NelderMead;
use crate::optimizer::{Bounds, OptimizationResult, Optimizer};
use crate::powell::Powell;
use crate::spsa::Spsa;

/// Available minimizers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    NelderMead,
    #[default]
    Powell,
    Spsa,
}

impl Method {
    /// All methods, in display order.
    pub const ALL: [Method; 3] = [Method::NelderMead, Method::Powell, Method::Spsa];

    pub fn name(self) -> &'static str {
        match self {
            Method::NelderMead => "nelder-mead",
            Method::Powell => "powell",
            Method::Spsa => "spsa",
        }
    }

    /// Run this method with the limits in `config`.
    ///
    /// `config.method` is ignored.
    pub fn minimize<F>(
        self,
        objective: F,
        initial_params: Vec<f64>,
        config: &OptimizerConfig,
    ) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        match self {
            Method::NelderMead => {
                let mut nm = NelderMead::new()
                    .with_maxiter(config.maxiter)
                    .with_tol(config.tol)
                    .with_trust_region(config.step, config.step * 1e-4);
                nm.bounds = config.bounds;
                nm.minimize(objective, initial_params)
            }
            Method::Powell => {
                let mut powell = Powell::new()
                    .with_maxiter(config.maxiter)
                    .with_tol(config.tol)
                    .with_step(config.step);
                powell.bounds = config.bounds;
                powell.minimize(objective, initial_params)
            }
            Method::Spsa => {
                let mut spsa = Spsa::new()
                    .with_maxiter(config.maxiter)
                    .with_tol(config.tol)
                    .with_seed(config.seed);
                spsa.c = config.step.min(spsa.c);
                spsa.bounds = config.bounds;
                spsa.minimize(objective, initial_params)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "nelder-mead" | "neldermead" | "nm" => Ok(Method::NelderMead),
            "powell" => Ok(Method::Powell),
            "spsa" => Ok(Method::Spsa),
            _ => Err(OptError::UnknownMethod(s.to_string())),
        }
    }
}

fn default_maxiter() -> usize {
    1000
}

fn default_tol() -> f64 {
    1e-8
}

fn default_step() -> f64 {
    0.5
}

fn default_seed() -> u64 {
    42
}

/// Which minimizer to run and its limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub method: Method,
    #[serde(default = "default_maxiter")]
    pub maxiter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
    /// Initial step size (simplex edge, line-search step, perturbation cap).
    #[serde(default = "default_step")]
    pub step: f64,
    /// Seed for stochastic methods.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            maxiter: default_maxiter(),
            tol: default_tol(),
            step: default_step(),
            seed: default_seed(),
            bounds: None,
        }
    }
}

impl OptimizerConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> OptResult<()> {
        if self.maxiter == 0 {
            return Err(OptError::InvalidConfig("maxiter must be positive".into()));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(OptError::InvalidConfig(format!(
                "tol must be a non-negative number, got {}",
                self.tol
            )));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(OptError::InvalidConfig(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if let Some(bounds) = &self.bounds {
            if !(bounds.lower <= bounds.upper) {
                return Err(OptError::InvalidConfig(format!(
                    "empty bounds [{}, {}]",
                    bounds.lower, bounds.upper
                )));
            }
        }
        Ok(())
    }
}

impl Optimizer for OptimizerConfig {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        self.method.minimize(objective, initial_params, self)
    }
}
