use serde::{Deserialize, Serialize};
use thiserror::Error;
use topo_core::hessian::curvature;
use topo_core::linalg::{dot, norm, project_out};
use topo_core::{Bounds, Lbfgs, LbfgsConfig, LocalMinimizer, Minimization, Potential, TopoError};
use topo_network::SimilarityComparer;

use crate::config::HefConfig;

/// Recoverable reasons a saddle search produced nothing.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum SearchFailure {
    /// The iteration budget ran out.
    #[error("no saddle after {iterations} steps (gradient norm {gradient_norm:e})")]
    NotConverged {
        /// Steps taken.
        iterations: usize,
        /// Gradient norm at the last iterate.
        gradient_norm: f64,
    },
    /// The saddle sits on a face of the domain.
    #[error("saddle lies on the domain boundary")]
    AtBounds,
    /// A pushoff minimisation did not converge.
    #[error("pushoff minimisation did not converge")]
    MinimaNotConverged,
    /// A connected minimum lies above the saddle.
    #[error("connected minimum lies above the saddle")]
    InvalidConnection,
    /// Both pushoffs relax to the same minimum.
    #[error("both sides relax to the same minimum")]
    Degenerate,
}

impl SearchFailure {
    /// Stable kebab-case label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchFailure::NotConverged { .. } => "not-converged",
            SearchFailure::AtBounds => "at-bounds",
            SearchFailure::MinimaNotConverged => "minima-not-converged",
            SearchFailure::InvalidConnection => "invalid-connection",
            SearchFailure::Degenerate => "degenerate",
        }
    }
}

/// Converged saddle together with the two minima it connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionStateSearch {
    /// Saddle coordinates.
    pub point: Vec<f64>,
    /// Potential value at the saddle.
    pub value: f64,
    /// Unit eigenvector of the negative eigenvalue.
    pub eigenvector: Vec<f64>,
    /// The negative eigenvalue.
    pub eigenvalue: f64,
    /// Gradient norm at the saddle.
    pub gradient_norm: f64,
    /// Steps taken.
    pub iterations: usize,
    /// Minimum reached from the `-mode` side.
    pub minus: Minimization,
    /// Minimum reached from the `+mode` side.
    pub plus: Minimization,
}

/// Potential whose gradient has the component along a fixed mode removed.
///
/// Minimising it relaxes a point within the hyperplane orthogonal to the mode.
pub struct SubspacePotential<'a> {
    inner: &'a dyn Potential,
    mode: Vec<f64>,
}

impl<'a> SubspacePotential<'a> {
    /// Wraps `inner`, projecting out the unit vector `mode`.
    pub fn new(inner: &'a dyn Potential, mode: &[f64]) -> Self {
        Self {
            inner,
            mode: mode.to_vec(),
        }
    }
}

impl Potential for SubspacePotential<'_> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn bounds(&self) -> &Bounds {
        self.inner.bounds()
    }

    fn value(&self, x: &[f64]) -> f64 {
        self.inner.value(x)
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        let mut g = self.inner.gradient(x);
        project_out(&mut g, &self.mode);
        g
    }

    fn value_and_gradient(&self, x: &[f64]) -> (f64, Vec<f64>) {
        let (f, mut g) = self.inner.value_and_gradient(x);
        project_out(&mut g, &self.mode);
        (f, g)
    }
}

/// Single-ended saddle search by hybrid eigenvector following.
///
/// Climbs along the lowest Hessian eigenvector and minimises in the
/// orthogonal complement until the gradient vanishes with exactly one
/// negative eigenvalue, then pushes off both ways to find the two minima.
#[derive(Debug, Clone)]
pub struct HybridEigenvectorFollowing {
    config: HefConfig,
    subspace: Lbfgs,
}

impl HybridEigenvectorFollowing {
    /// Creates the search after validating `config`.
    pub fn new(config: HefConfig) -> Result<Self, TopoError> {
        config.validate()?;
        let subspace = Lbfgs::new(LbfgsConfig {
            conv_crit: config.conv_crit,
            max_iterations: config.max_subspace_iterations,
            ..LbfgsConfig::default()
        });
        Ok(Self { config, subspace })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HefConfig {
        &self.config
    }

    /// Converges `seed` to a saddle and locates its two minima.
    ///
    /// `minimizer` relaxes the pushoff points; `comparer` decides whether they
    /// landed in the same minimum.
    pub fn run(
        &self,
        potential: &dyn Potential,
        minimizer: &dyn LocalMinimizer,
        comparer: &SimilarityComparer,
        seed: &[f64],
    ) -> Result<TransitionStateSearch, SearchFailure> {
        let bounds = potential.bounds();
        let tolerance = self.config.eigenvalue_tolerance;
        let mut x = bounds.clamped(seed);
        let mut iterations = 0;

        let (value, gradient_norm, eigenvalue, mode) = loop {
            let (f, g) = potential.value_and_gradient(&x);
            let spectrum = curvature(potential, &x, self.config.fd_step);
            let (lowest, mode) = spectrum.lowest();
            let mode = mode.to_vec();
            let g_norm = norm(&g);
            if g_norm < self.config.conv_crit && spectrum.negative_count(tolerance) == 1 {
                break (f, g_norm, lowest, mode);
            }
            if iterations == self.config.ts_steps {
                log::debug!("saddle search gave up at gradient norm {g_norm:e}");
                return Err(SearchFailure::NotConverged {
                    iterations,
                    gradient_norm: g_norm,
                });
            }
            iterations += 1;

            let along = dot(&g, &mode);
            let step = if lowest < -tolerance {
                uphill_step(along, lowest).clamp(
                    -self.config.max_uphill_step_size,
                    self.config.max_uphill_step_size,
                )
            } else if along < 0.0 {
                -self.config.positive_eigenvalue_step
            } else {
                self.config.positive_eigenvalue_step
            };
            for (xi, vi) in x.iter_mut().zip(&mode) {
                *xi += step * vi;
            }
            bounds.clamp(&mut x);

            if x.len() > 1 {
                let restricted = SubspacePotential::new(potential, &mode);
                x = self.subspace.minimize(&restricted, &x).point;
            }
        };

        if self.config.reject_bounds && bounds.at_bounds(&x, self.config.bounds_tolerance) {
            return Err(SearchFailure::AtBounds);
        }

        let pushed = |sign: f64| -> Vec<f64> {
            let mut p: Vec<f64> = x
                .iter()
                .zip(&mode)
                .map(|(xi, vi)| xi + sign * self.config.pushoff * vi)
                .collect();
            bounds.clamp(&mut p);
            p
        };
        let minus = minimizer.minimize(potential, &pushed(-1.0));
        let plus = minimizer.minimize(potential, &pushed(1.0));
        if !minus.converged || !plus.converged {
            return Err(SearchFailure::MinimaNotConverged);
        }
        if minus.value > value || plus.value > value {
            return Err(SearchFailure::InvalidConnection);
        }
        if comparer.is_same(&minus.point, minus.value, &plus.point, plus.value) {
            return Err(SearchFailure::Degenerate);
        }

        log::debug!("saddle converged after {iterations} steps at value {value}");
        Ok(TransitionStateSearch {
            point: x,
            value,
            eigenvector: mode,
            eigenvalue,
            gradient_norm,
            iterations,
            minus,
            plus,
        })
    }
}

/// Eigenvector-following step maximising along a mode with eigenvalue `lambda < 0`.
///
/// Reduces to the Newton step `g / |lambda|` near the saddle and stays finite
/// far from it.
pub fn uphill_step(gradient_along: f64, lambda: f64) -> f64 {
    let ratio = gradient_along / lambda;
    2.0 * gradient_along / (lambda.abs() * (1.0 + (1.0 + 4.0 * ratio * ratio).sqrt()))
}
