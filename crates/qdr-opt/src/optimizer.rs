//! The minimizer interface shared by every optimizer.

use serde::{Deserialize, Serialize};

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Best parameter values seen.
    pub optimal_params: Vec<f64>,
    /// Objective value at `optimal_params`.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best value after each iteration.
    pub history: Vec<f64>,
    /// Whether the stopping tolerance was met before `maxiter`.
    pub converged: bool,
}

/// A gradient-free minimizer.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64;
}

/// Box constraints applied to every coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Clamp every coordinate into `[lower, upper]`.
    pub fn project(&self, x: &mut [f64]) {
        for v in x {
            *v = v.clamp(self.lower, self.upper);
        }
    }
}

/// Counts evaluations, applies bounds and remembers the best point seen.
pub(crate) struct Evaluator<F> {
    objective: F,
    bounds: Option<Bounds>,
    scratch: Vec<f64>,
    pub(crate) evaluations: usize,
    pub(crate) best_params: Vec<f64>,
    pub(crate) best_value: f64,
}

impl<F: FnMut(&[f64]) -> f64> Evaluator<F> {
    pub(crate) fn new(objective: F, bounds: Option<Bounds>, dimension: usize) -> Self {
        Self {
            objective,
            bounds,
            scratch: Vec::with_capacity(dimension),
            evaluations: 0,
            best_params: vec![0.0; dimension],
            best_value: f64::INFINITY,
        }
    }

    /// Project `x` in place and evaluate it.
    pub(crate) fn eval_mut(&mut self, x: &mut [f64]) -> f64 {
        if let Some(bounds) = &self.bounds {
            bounds.project(x);
        }
        self.eval_projected(x)
    }

    /// Evaluate a projected copy of `x`.
    pub(crate) fn eval(&mut self, x: &[f64]) -> f64 {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        scratch.extend_from_slice(x);
        let value = self.eval_mut(&mut scratch);
        self.scratch = scratch;
        value
    }

    fn eval_projected(&mut self, x: &[f64]) -> f64 {
        let value = (self.objective)(x);
        self.evaluations += 1;
        // NaN never beats a number.
        let better = value < self.best_value || (self.best_value.is_nan() && !value.is_nan());
        if better || self.evaluations == 1 {
            self.best_value = value;
            self.best_params.clear();
            self.best_params.extend_from_slice(x);
        }
        value
    }

    pub(crate) fn finish(
        self,
        num_iterations: usize,
        history: Vec<f64>,
        converged: bool,
    ) -> OptimizationResult {
        OptimizationResult {
            optimal_params: self.best_params,
            optimal_value: self.best_value,
            num_evaluations: self.evaluations,
            num_iterations,
            history,
            converged,
        }
    }
}
