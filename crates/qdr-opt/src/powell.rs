//! Powell's conjugate-direction method.
//!
//! Each iteration runs a line minimisation along every direction in the set,
//! then tries the net displacement of the iteration as a new direction,
//! replacing the direction that gave the largest decrease. Line
//! minimisation brackets a minimum by golden-ratio expansion and narrows it
//! by golden-section search, so no derivatives are needed.

use tracing::trace;

use crate::optimizer::{Bounds, Evaluator, OptimizationResult, Optimizer};

const GOLDEN: f64 = 1.618_033_988_749_895;
const INV_GOLDEN: f64 = 0.618_033_988_749_895;
const MAX_BRACKET_STEPS: usize = 50;
const MAX_SECTION_STEPS: usize = 100;

/// Powell optimizer configuration.
#[derive(Debug, Clone)]
pub struct Powell {
    /// Maximum number of iterations (full sweeps over the direction set).
    pub maxiter: usize,
    /// Relative decrease per sweep below which the run stops.
    pub tol: f64,
    /// First trial step of each line search.
    pub step: f64,
    /// Bracket width at which a line search stops.
    pub line_tol: f64,
    /// Optional box constraints.
    pub bounds: Option<Bounds>,
}

impl Default for Powell {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            tol: 1e-8,
            step: 0.5,
            line_tol: 1e-6,
            bounds: None,
        }
    }
}

impl Powell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the initial line-search step.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl Optimizer for Powell {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = initial_params.len();
        let mut ev = Evaluator::new(objective, self.bounds, n);
        let mut x = initial_params;
        let mut fx = ev.eval_mut(&mut x);
        let mut history = vec![fx];
        if n == 0 {
            return ev.finish(0, history, true);
        }

        let mut directions: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let mut d = vec![0.0; n];
                d[i] = 1.0;
                d
            })
            .collect();
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.maxiter {
            iterations += 1;
            let x_start = x.clone();
            let f_start = fx;
            let mut biggest_drop = 0.0;
            let mut biggest_idx = 0;

            for (i, direction) in directions.iter().enumerate() {
                let f_before = fx;
                fx = self.line_minimize(&mut ev, &mut x, direction, fx);
                if f_before - fx > biggest_drop {
                    biggest_drop = f_before - fx;
                    biggest_idx = i;
                }
            }
            history.push(ev.best_value);
            trace!(iteration = iterations, value = fx, "Powell sweep");

            if 2.0 * (f_start - fx) <= self.tol * (f_start.abs() + fx.abs()) + f64::MIN_POSITIVE {
                converged = true;
                break;
            }

            let delta: Vec<f64> = x.iter().zip(&x_start).map(|(a, b)| a - b).collect();
            let mut extrapolated: Vec<f64> = x.iter().zip(&delta).map(|(a, d)| a + d).collect();
            let f_ext = ev.eval_mut(&mut extrapolated);
            if f_ext < f_start {
                let t = 2.0 * (f_start - 2.0 * fx + f_ext) * (f_start - fx - biggest_drop).powi(2)
                    - biggest_drop * (f_start - f_ext).powi(2);
                if t < 0.0 {
                    fx = self.line_minimize(&mut ev, &mut x, &delta, fx);
                    directions[biggest_idx] = directions[n - 1].clone();
                    directions[n - 1] = delta;
                }
            }
        }

        ev.finish(iterations, history, converged)
    }
}

impl Powell {
    /// Minimise along `direction` from `x`, moving `x` to the best point
    /// found. Returns the value there.
    fn line_minimize<F: FnMut(&[f64]) -> f64>(
        &self,
        ev: &mut Evaluator<F>,
        x: &mut Vec<f64>,
        direction: &[f64],
        fx: f64,
    ) -> f64 {
        if direction.iter().all(|d| *d == 0.0) {
            return fx;
        }
        let mut best = (0.0, fx);
        let mut phi = |ev: &mut Evaluator<F>, alpha: f64| {
            let mut point = point_at(x, direction, alpha);
            let value = ev.eval_mut(&mut point);
            if value < best.1 {
                best = (alpha, value);
            }
            value
        };

        // Bracket: walk downhill with growing steps until the value rises.
        let mut a = 0.0;
        let mut b = self.step;
        let mut fb = phi(ev, b);
        if fb > fx {
            (a, b) = (b, a);
            fb = fx;
        }
        let mut c = b + GOLDEN * (b - a);
        let mut fc = phi(ev, c);
        let mut steps = 0;
        while fc < fb && steps < MAX_BRACKET_STEPS {
            a = b;
            (b, fb) = (c, fc);
            c = b + GOLDEN * (b - a);
            fc = phi(ev, c);
            steps += 1;
        }

        // Golden-section search inside [a, c].
        let (mut lo, mut hi) = if a < c { (a, c) } else { (c, a) };
        let mut x1 = hi - INV_GOLDEN * (hi - lo);
        let mut x2 = lo + INV_GOLDEN * (hi - lo);
        let mut f1 = phi(ev, x1);
        let mut f2 = phi(ev, x2);
        let mut steps = 0;
        while hi - lo > self.line_tol * (1.0 + x1.abs() + x2.abs()) && steps < MAX_SECTION_STEPS {
            if f1 < f2 {
                hi = x2;
                (x2, f2) = (x1, f1);
                x1 = hi - INV_GOLDEN * (hi - lo);
                f1 = phi(ev, x1);
            } else {
                lo = x1;
                (x1, f1) = (x2, f2);
                x2 = lo + INV_GOLDEN * (hi - lo);
                f2 = phi(ev, x2);
            }
            steps += 1;
        }

        let (alpha, value) = best;
        if alpha != 0.0 {
            let mut point = point_at(x, direction, alpha);
            if let Some(bounds) = &self.bounds {
                bounds.project(&mut point);
            }
            *x = point;
        }
        value
    }
}

fn point_at(x: &[f64], direction: &[f64], alpha: f64) -> Vec<f64> {
    x.iter().zip(direction).map(|(xi, di)| xi + alpha * di).collect()
}
