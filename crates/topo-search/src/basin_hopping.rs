use serde::{Deserialize, Serialize};
use topo_core::linalg::norm;
use topo_core::{LocalMinimizer, Minimization, Potential, RngHandle, TopoError};
use topo_network::KineticTransitionNetwork;

use crate::config::BasinHoppingConfig;
use crate::step_taker::PerturbationStepTaker;

/// Summary returned after a basin-hopping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasinHoppingSummary {
    /// Steps executed (always the configured count).
    pub n_steps: usize,
    /// Trials accepted by the Metropolis test.
    pub accepted: usize,
    /// Valid trials rejected by the Metropolis test.
    pub rejected: usize,
    /// Trials discarded before the Metropolis test.
    pub invalid: usize,
    /// `accepted / n_steps`.
    pub acceptance_rate: f64,
    /// Network size before the run.
    pub minima_before: usize,
    /// Network size after the run.
    pub minima_after: usize,
    /// Lowest value seen among valid minima.
    pub best_value: Option<f64>,
    /// Location of `best_value`.
    pub best_point: Option<Vec<f64>>,
    /// Value of the current point after the initial minimisation and after
    /// every accepted step, in order.
    pub accepted_values: Vec<f64>,
    /// Per-coordinate displacement limits at the end of the run.
    pub final_displacements: Vec<f64>,
}

/// Global optimiser combining perturbation, local minimisation and a
/// Metropolis acceptance test.
///
/// Every valid trial minimum is inserted into the network whether accepted
/// or not; only the walk depends on acceptance.
#[derive(Debug, Clone, Default)]
pub struct BasinHopping {
    config: BasinHoppingConfig,
}

impl BasinHopping {
    /// Creates the optimiser after validating `config`.
    pub fn new(config: BasinHoppingConfig) -> Result<Self, TopoError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BasinHoppingConfig {
        &self.config
    }

    /// Runs exactly `n_steps` iterations from `start` (default: domain centre).
    pub fn run(
        &self,
        network: &mut KineticTransitionNetwork,
        potential: &dyn Potential,
        minimizer: &dyn LocalMinimizer,
        start: Option<&[f64]>,
        rng: &mut RngHandle,
    ) -> Result<BasinHoppingSummary, TopoError> {
        let bounds = potential.bounds();
        let start = match start {
            Some(point) => {
                bounds.check_dimension(point)?;
                bounds.clamped(point)
            }
            None => bounds.centre(),
        };
        let minima_before = network.n_minima();
        let mut step_taker = PerturbationStepTaker::new(&self.config.step, bounds);

        let initial = minimizer.minimize(potential, &start);
        let mut best: Option<(f64, Vec<f64>)> = None;
        if self.is_valid(potential, &initial) {
            network.add_minimum(&initial.point, initial.value)?;
            best = Some((initial.value, initial.point.clone()));
        }
        let mut current = initial;
        let mut accepted_values = vec![current.value];
        let (mut accepted, mut rejected, mut invalid) = (0, 0, 0);
        let mut window_accepted = 0;

        for step in 1..=self.config.n_steps {
            let candidate = step_taker.propose(&current.point, rng);
            let trial = minimizer.minimize(potential, &candidate);
            if !self.is_valid(potential, &trial) {
                invalid += 1;
            } else {
                network.add_minimum(&trial.point, trial.value)?;
                if best.as_ref().map_or(true, |(value, _)| trial.value < *value) {
                    best = Some((trial.value, trial.point.clone()));
                }
                if self.metropolis(current.value, trial.value, rng) {
                    accepted += 1;
                    window_accepted += 1;
                    accepted_values.push(trial.value);
                    log::debug!("step {step}: accepted {:.6e}", trial.value);
                    current = trial;
                } else {
                    rejected += 1;
                }
            }

            let interval = self.config.adjust_interval;
            if interval > 0 && step % interval == 0 {
                let rate = window_accepted as f64 / interval as f64;
                let factor = if rate > self.config.target_acceptance {
                    1.0 / self.config.adjust_factor
                } else {
                    self.config.adjust_factor
                };
                step_taker.scale(factor);
                log::debug!(
                    "step {step}: acceptance {rate:.2}, displacement scaled by {factor:.3}"
                );
                window_accepted = 0;
            }
        }

        let summary = BasinHoppingSummary {
            n_steps: self.config.n_steps,
            accepted,
            rejected,
            invalid,
            acceptance_rate: if self.config.n_steps == 0 {
                0.0
            } else {
                accepted as f64 / self.config.n_steps as f64
            },
            minima_before,
            minima_after: network.n_minima(),
            best_value: best.as_ref().map(|(value, _)| *value),
            best_point: best.map(|(_, point)| point),
            accepted_values,
            final_displacements: step_taker.displacements().to_vec(),
        };
        log::info!(
            "basin hopping: {} steps, {} accepted, {} invalid, {} -> {} minima, best {:?}",
            summary.n_steps,
            summary.accepted,
            summary.invalid,
            summary.minima_before,
            summary.minima_after,
            summary.best_value
        );
        Ok(summary)
    }

    /// Metropolis test; ties and downhill moves are always accepted.
    fn metropolis(&self, current: f64, trial: f64, rng: &mut RngHandle) -> bool {
        if trial <= current {
            return true;
        }
        if self.config.temperature <= 0.0 {
            return false;
        }
        let acceptance = (-(trial - current) / self.config.temperature).exp().min(1.0);
        rng.uniform() < acceptance
    }

    fn is_valid(&self, potential: &dyn Potential, minimum: &Minimization) -> bool {
        if !minimum.converged || !minimum.value.is_finite() {
            return false;
        }
        if self.config.reject_bounds_minima
            && potential
                .bounds()
                .at_bounds(&minimum.point, self.config.bounds_tolerance)
            && norm(&potential.gradient(&minimum.point)) > self.config.bounds_gradient_tolerance
        {
            return false;
        }
        true
    }
}
