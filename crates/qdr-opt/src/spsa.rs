//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Each iteration estimates the gradient from two evaluations along a random
//! ±1 direction, with gain sequences `a_k = a / (k + 1 + A)^alpha` and
//! `c_k = c / (k + 1)^gamma`. The perturbation directions come from a seeded
//! [`StdRng`], so runs are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::optimizer::{Bounds, Evaluator, OptimizationResult, Optimizer};

/// SPSA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Spsa {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Step below which the run counts as converged.
    pub tol: f64,
    /// Learning-rate numerator.
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Learning-rate decay exponent.
    pub alpha: f64,
    /// Perturbation decay exponent.
    pub gamma: f64,
    /// Stability offset of the learning rate.
    pub stability: f64,
    /// Seed of the perturbation sequence.
    pub seed: u64,
    /// Optional box constraints.
    pub bounds: Option<Bounds>,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            maxiter: 300,
            tol: 1e-8,
            a: 0.2,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            stability: 10.0,
            seed: 42,
            bounds: None,
        }
    }
}

impl Spsa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
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

    /// Set learning rate and perturbation size.
    #[must_use]
    pub fn with_gains(mut self, a: f64, c: f64) -> Self {
        self.a = a;
        self.c = c;
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
}

impl Optimizer for Spsa {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = initial_params.len();
        let mut ev = Evaluator::new(objective, self.bounds, n);
        let mut x = initial_params;
        let f_x = ev.eval_mut(&mut x);
        let mut history = vec![f_x];
        if n == 0 {
            return ev.finish(0, history, true);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut converged = false;
        let mut iterations = 0;

        for k in 0..self.maxiter {
            iterations += 1;
            let a_k = self.a / (k as f64 + 1.0 + self.stability).powf(self.alpha);
            let c_k = self.c / (k as f64 + 1.0).powf(self.gamma);

            let delta: Vec<f64> = (0..n)
                .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();
            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();
            let f_plus = ev.eval(&x_plus);
            let f_minus = ev.eval(&x_minus);

            let slope = (f_plus - f_minus) / (2.0 * c_k);
            if !slope.is_finite() {
                // One side hit an invalid region; try a fresh direction.
                history.push(ev.best_value);
                continue;
            }

            let mut largest_step: f64 = 0.0;
            for (xi, di) in x.iter_mut().zip(&delta) {
                // delta is ±1, so 1/delta == delta.
                let step = a_k * slope * di;
                *xi -= step;
                largest_step = largest_step.max(step.abs());
            }
            if let Some(bounds) = &self.bounds {
                bounds.project(&mut x);
            }
            history.push(ev.best_value);
            trace!(iteration = k, step = largest_step, "SPSA step");

            if largest_step < self.tol {
                converged = true;
                break;
            }
        }

        // The iterate itself is never evaluated inside the loop.
        ev.eval_mut(&mut x);
        ev.finish(iterations, history, converged)
    }
}
