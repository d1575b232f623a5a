use topo_core::{Bounds, RngHandle};

use crate::config::StepTakerConfig;

/// Proposes randomly displaced points for basin hopping.
///
/// Each coordinate moves by a uniform draw from
/// `[-displacement_i, displacement_i]`; the result is clamped into the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationStepTaker {
    bounds: Bounds,
    displacements: Vec<f64>,
}

impl PerturbationStepTaker {
    /// Resolves the configured displacement against `bounds`.
    pub fn new(config: &StepTakerConfig, bounds: &Bounds) -> Self {
        let displacements = if config.proportional {
            bounds
                .ranges()
                .iter()
                .map(|range| config.max_displacement * range)
                .collect()
        } else {
            vec![config.max_displacement; bounds.dimension()]
        };
        Self {
            bounds: bounds.clone(),
            displacements,
        }
    }

    /// Current per-coordinate displacement limits.
    pub fn displacements(&self) -> &[f64] {
        &self.displacements
    }

    /// Multiplies every displacement limit by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for d in &mut self.displacements {
            *d *= factor;
        }
    }

    /// Draws a candidate around `point`.
    pub fn propose(&self, point: &[f64], rng: &mut RngHandle) -> Vec<f64> {
        let mut candidate: Vec<f64> = point
            .iter()
            .zip(&self.displacements)
            .map(|(x, d)| x + rng.uniform_in(-d, *d))
            .collect();
        self.bounds.clamp(&mut candidate);
        candidate
    }
}
