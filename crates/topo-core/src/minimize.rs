//! Local minimisation contract and the default bound-constrained L-BFGS driver.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::linalg::{axpy, dot, norm, sub};
use crate::Potential;

/// Outcome of a local minimisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimization {
    /// Final (bounds-clamped) point.
    pub point: Vec<f64>,
    /// Potential value at `point`.
    pub value: f64,
    /// Norm of the projected gradient at `point`.
    pub gradient_norm: f64,
    /// Whether the projected gradient fell below the tolerance.
    pub converged: bool,
    /// Iterations consumed.
    pub iterations: usize,
}

/// Drives a point downhill to a nearby stationary point.
pub trait LocalMinimizer: Send + Sync {
    /// Minimises `potential` starting from `start`.
    fn minimize(&self, potential: &dyn Potential, start: &[f64]) -> Minimization;
}

/// Tunables for [`Lbfgs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbfgsConfig {
    /// Projected gradient norm below which the run is converged.
    #[serde(default = "default_conv_crit")]
    pub conv_crit: f64,
    /// Number of correction pairs kept (quasi-Newton memory).
    #[serde(default = "default_history")]
    pub history: usize,
    /// Iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Length of the first steepest-descent step.
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
}

fn default_conv_crit() -> f64 {
    1e-6
}

fn default_history() -> usize {
    10
}

fn default_max_iterations() -> usize {
    1000
}

fn default_initial_step() -> f64 {
    1.0
}

impl Default for LbfgsConfig {
    fn default() -> Self {
        Self {
            conv_crit: default_conv_crit(),
            history: default_history(),
            max_iterations: default_max_iterations(),
            initial_step: default_initial_step(),
        }
    }
}

/// Projected limited-memory BFGS minimiser honouring box bounds.
///
/// Directions come from the two-loop recursion applied to the projected
/// gradient; variables pinned at a face with the gradient pointing outwards
/// are frozen for the iteration. Steps are accepted by an Armijo backtracking
/// search along the projected path.
#[derive(Debug, Clone, Default)]
pub struct Lbfgs {
    config: LbfgsConfig,
}

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
const CURVATURE_FLOOR: f64 = 1e-12;

impl Lbfgs {
    /// Creates a minimiser with the given configuration.
    pub fn new(config: LbfgsConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LbfgsConfig {
        &self.config
    }

    fn direction(
        &self,
        pg: &[f64],
        history: &VecDeque<(Vec<f64>, Vec<f64>, f64)>,
    ) -> Vec<f64> {
        let mut q = pg.to_vec();
        let mut alphas = Vec::with_capacity(history.len());
        for (s, y, rho) in history.iter().rev() {
            let alpha = rho * dot(s, &q);
            axpy(-alpha, y, &mut q);
            alphas.push(alpha);
        }
        match history.back() {
            Some((s, y, _)) => {
                let gamma = dot(s, y) / dot(y, y);
                for v in q.iter_mut() {
                    *v *= gamma;
                }
            }
            None => {
                let scale = (self.config.initial_step / norm(pg).max(f64::EPSILON)).min(1.0);
                for v in q.iter_mut() {
                    *v *= scale;
                }
            }
        }
        for ((s, y, rho), alpha) in history.iter().zip(alphas.iter().rev()) {
            let beta = rho * dot(y, &q);
            axpy(alpha - beta, s, &mut q);
        }
        q.iter().map(|v| -v).collect()
    }
}

/// Gradient with components zeroed where a bound blocks descent.
pub fn projected_gradient(bounds: &Bounds, x: &[f64], gradient: &[f64]) -> Vec<f64> {
    gradient
        .iter()
        .zip(x)
        .zip(bounds.lower().iter().zip(bounds.upper()))
        .map(|((g, xi), (lo, hi))| {
            if (*xi <= *lo && *g > 0.0) || (*xi >= *hi && *g < 0.0) {
                0.0
            } else {
                *g
            }
        })
        .collect()
}

impl LocalMinimizer for Lbfgs {
    fn minimize(&self, potential: &dyn Potential, start: &[f64]) -> Minimization {
        let bounds = potential.bounds();
        let mut x = bounds.clamped(start);
        let (mut f, mut g) = potential.value_and_gradient(&x);
        let mut history: VecDeque<(Vec<f64>, Vec<f64>, f64)> =
            VecDeque::with_capacity(self.config.history);
        let mut pg = projected_gradient(bounds, &x, &g);
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            if norm(&pg) < self.config.conv_crit {
                break;
            }
            iterations += 1;

            let mut d = self.direction(&pg, &history);
            for (di, pgi) in d.iter_mut().zip(&pg) {
                if *pgi == 0.0 {
                    *di = 0.0;
                }
            }
            if dot(&d, &pg) >= 0.0 {
                history.clear();
                d = self.direction(&pg, &history);
            }

            let mut alpha = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let mut trial = x.clone();
                axpy(alpha, &d, &mut trial);
                bounds.clamp(&mut trial);
                let (f_trial, g_trial) = potential.value_and_gradient(&trial);
                let step = sub(&trial, &x);
                if f_trial <= f + ARMIJO * dot(&g, &step) && f_trial.is_finite() {
                    accepted = Some((trial, f_trial, g_trial, step));
                    break;
                }
                alpha *= 0.5;
            }

            let Some((x_new, f_new, g_new, s)) = accepted else {
                if history.is_empty() {
                    log::debug!("l-bfgs line search stalled after {iterations} iterations");
                    break;
                }
                history.clear();
                continue;
            };

            let step_norm = norm(&s);
            let y = sub(&g_new, &g);
            let sy = dot(&s, &y);
            if sy > CURVATURE_FLOOR * norm(&y).max(1.0) * step_norm {
                if history.len() == self.config.history.max(1) {
                    history.pop_front();
                }
                history.push_back((s, y, 1.0 / sy));
            }
            x = x_new;
            f = f_new;
            g = g_new;
            pg = projected_gradient(bounds, &x, &g);
            if step_norm <= f64::EPSILON * (1.0 + norm(&x)) {
                break;
            }
        }

        let gradient_norm = norm(&pg);
        Minimization {
            point: x,
            value: f,
            gradient_norm,
            converged: gradient_norm < self.config.conv_crit,
            iterations,
        }
    }
}
