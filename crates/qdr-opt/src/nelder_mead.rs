//! Nelder-Mead simplex search with a shrinking trust radius.
//!
//! Reflections are clipped to the current radius around the centroid. When
//! the simplex flattens out (value spread below `tol`) the radius is halved
//! and the simplex is rebuilt around the best vertex, until the radius
//! reaches `rho_end`.

use tracing::trace;

use crate::optimizer::{Bounds, Evaluator, OptimizationResult, Optimizer};

/// Nelder-Mead optimizer configuration.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Value spread at which the simplex counts as flat.
    pub tol: f64,
    /// Initial simplex edge and trust radius.
    pub rho_begin: f64,
    /// Final trust radius.
    pub rho_end: f64,
    /// Optional box constraints.
    pub bounds: Option<Bounds>,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            tol: 1e-8,
            rho_begin: 0.5,
            rho_end: 1e-4,
            bounds: None,
        }
    }
}

impl NelderMead {
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

    /// Set trust region radii.
    #[must_use]
    pub fn with_trust_region(mut self, rho_begin: f64, rho_end: f64) -> Self {
        self.rho_begin = rho_begin;
        self.rho_end = rho_end;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl Optimizer for NelderMead {
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

        let mut rho = self.rho_begin;
        let (mut simplex, mut f_simplex) = build_simplex(&mut ev, x, f_x, rho);
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.maxiter {
            iterations += 1;

            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| f_simplex[a].total_cmp(&f_simplex[b]));
            let best = order[0];
            let worst = order[n];
            let second_worst = order[n - 1];

            let spread = f_simplex[worst] - f_simplex[best];
            if spread < self.tol {
                if rho <= self.rho_end {
                    converged = true;
                    break;
                }
                rho = (rho * 0.5).max(self.rho_end);
                trace!(rho, value = f_simplex[best], "Shrinking trust radius");
                let anchor = simplex[best].clone();
                let f_anchor = f_simplex[best];
                (simplex, f_simplex) = build_simplex(&mut ev, anchor, f_anchor, rho);
                history.push(ev.best_value);
                continue;
            }

            let mut centroid = vec![0.0; n];
            for &idx in &order[..n] {
                for (c, v) in centroid.iter_mut().zip(&simplex[idx]) {
                    *c += v;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            // Reflection, clipped to the trust radius.
            let mut reflected: Vec<f64> = centroid
                .iter()
                .zip(&simplex[worst])
                .map(|(c, w)| {
                    let step = c - w;
                    c + step.clamp(-rho, rho)
                })
                .collect();
            let f_reflected = ev.eval_mut(&mut reflected);

            if f_reflected < f_simplex[best] {
                let mut expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = ev.eval_mut(&mut expanded);
                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    f_simplex[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    f_simplex[worst] = f_reflected;
                }
            } else if f_reflected < f_simplex[second_worst] {
                simplex[worst] = reflected;
                f_simplex[worst] = f_reflected;
            } else {
                let mut contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex[worst])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = ev.eval_mut(&mut contracted);
                if f_contracted < f_simplex[worst] {
                    simplex[worst] = contracted;
                    f_simplex[worst] = f_contracted;
                } else {
                    let anchor = simplex[best].clone();
                    for i in (0..=n).filter(|&i| i != best) {
                        for (v, a) in simplex[i].iter_mut().zip(&anchor) {
                            *v = 0.5 * (a + *v);
                        }
                        f_simplex[i] = ev.eval_mut(&mut simplex[i]);
                    }
                }
            }

            history.push(ev.best_value);
        }

        ev.finish(iterations, history, converged)
    }
}

/// Axis-aligned simplex of edge `rho` anchored at `x`.
fn build_simplex<F: FnMut(&[f64]) -> f64>(
    ev: &mut Evaluator<F>,
    x: Vec<f64>,
    f_x: f64,
    rho: f64,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let n = x.len();
    let mut simplex = Vec::with_capacity(n + 1);
    let mut values = Vec::with_capacity(n + 1);
    for i in 0..n {
        let mut point = x.clone();
        point[i] += rho;
        values.push(ev.eval_mut(&mut point));
        simplex.push(point);
    }
    simplex.insert(0, x);
    values.insert(0, f_x);
    (simplex, values)
}
