use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};
use topo_core::linalg::{distance, dot, lerp, norm, normalize, sub};
use topo_core::Potential;

use crate::config::NebConfig;

/// Relaxed band returned by [`NudgedElasticBand::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NebOutcome {
    /// Images including both fixed endpoints.
    pub band: Vec<Vec<f64>>,
    /// Potential value of every image.
    pub values: Vec<f64>,
    /// Whether the largest image force fell below the criterion.
    pub converged: bool,
    /// Relaxation iterations consumed.
    pub iterations: usize,
    /// Spring constant at the end of the relaxation.
    pub force_constant: f64,
}

impl NebOutcome {
    /// Indices of interior images that are local maxima of the value profile.
    pub fn maxima_indices(&self) -> Vec<usize> {
        (1..self.values.len().saturating_sub(1))
            .filter(|&i| {
                self.values[i] > self.values[i - 1] && self.values[i] >= self.values[i + 1]
            })
            .collect()
    }

    /// Interior images that are local maxima; the seeds for saddle searches.
    pub fn path_maxima(&self) -> Vec<Vec<f64>> {
        self.maxima_indices()
            .into_iter()
            .map(|i| self.band[i].clone())
            .collect()
    }
}

/// Double-ended path search between two minima.
///
/// Each interior image feels the potential force perpendicular to the local
/// tangent plus the spring force along it. The band is relaxed with FIRE
/// damped dynamics; once converged, uneven spacing stiffens the springs and
/// relaxation resumes.
#[derive(Debug, Clone, Default)]
pub struct NudgedElasticBand {
    config: NebConfig,
}

const FIRE_ALPHA: f64 = 0.1;
const FIRE_ALPHA_DECAY: f64 = 0.99;
const FIRE_GROW: f64 = 1.1;
const FIRE_SHRINK: f64 = 0.5;
const FIRE_DELAY: usize = 5;

impl NudgedElasticBand {
    /// Creates the search after validating `config`.
    pub fn new(config: NebConfig) -> Result<Self, TopoError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NebConfig {
        &self.config
    }

    /// Linear interpolation from `start` to `end` with the configured image count.
    pub fn initial_band(&self, start: &[f64], end: &[f64]) -> Vec<Vec<f64>> {
        let wanted = (distance(start, end) * self.config.image_density).ceil();
        let interior = if wanted.is_finite() && wanted > 0.0 {
            (wanted as usize).clamp(self.config.min_images, self.config.max_images)
        } else {
            self.config.min_images
        };
        let segments = interior + 1;
        (0..=segments)
            .map(|i| lerp(start, end, i as f64 / segments as f64))
            .collect()
    }

    /// Relaxes a band between `start` and `end`.
    ///
    /// Never fails on non-convergence: the band with the smallest peak force
    /// seen is returned with `converged = false`.
    pub fn run(
        &self,
        potential: &dyn Potential,
        start: &[f64],
        end: &[f64],
    ) -> Result<NebOutcome, TopoError> {
        let bounds = potential.bounds();
        bounds.check_dimension(start)?;
        bounds.check_dimension(end)?;
        if start == end {
            return Err(TopoError::Search(ErrorInfo::new(
                "neb-identical-endpoints",
                "band endpoints coincide",
            )));
        }

        let mut band = self.initial_band(start, end);
        let n = band.len();
        let mut values: Vec<f64> = band.iter().map(|x| potential.value(x)).collect();
        let mut k = self.config.force_constant;
        let mut velocity = vec![vec![0.0; start.len()]; n];
        let mut dt = self.config.time_step;
        let mut alpha = FIRE_ALPHA;
        let mut downhill_run = 0;

        let mut best: Option<(f64, Vec<Vec<f64>>, Vec<f64>)> = None;
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            let forces = self.forces(potential, &band, &values, k);
            let peak = forces.iter().map(|f| norm(f)).fold(0.0, f64::max);
            if best.as_ref().map_or(true, |(b, _, _)| peak < *b) {
                best = Some((peak, band.clone(), values.clone()));
            }
            if peak < self.config.conv_crit {
                if self.spacing_ratio(&band) > self.config.spacing_tolerance
                    && k < self.config.max_force_constant
                    && self.config.force_constant_growth > 1.0
                {
                    k = (k * self.config.force_constant_growth).min(self.config.max_force_constant);
                    log::debug!("neb spacing uneven, force constant raised to {k}");
                    for v in &mut velocity {
                        v.iter_mut().for_each(|c| *c = 0.0);
                    }
                    dt = self.config.time_step;
                    alpha = FIRE_ALPHA;
                    downhill_run = 0;
                    best = None;
                    continue;
                }
                converged = true;
                break;
            }
            iterations += 1;

            let power: f64 = forces.iter().zip(&velocity).map(|(f, v)| dot(f, v)).sum();
            if power > 0.0 {
                let v_norm = velocity.iter().map(|v| dot(v, v)).sum::<f64>().sqrt();
                let f_norm = forces.iter().map(|f| dot(f, f)).sum::<f64>().sqrt();
                for (v, f) in velocity.iter_mut().zip(&forces) {
                    for (vi, fi) in v.iter_mut().zip(f) {
                        *vi = (1.0 - alpha) * *vi + alpha * v_norm * fi / f_norm;
                    }
                }
                downhill_run += 1;
                if downhill_run > FIRE_DELAY {
                    dt = (dt * FIRE_GROW).min(self.config.max_time_step);
                    alpha *= FIRE_ALPHA_DECAY;
                }
            } else if power < 0.0 {
                for v in &mut velocity {
                    v.iter_mut().for_each(|c| *c = 0.0);
                }
                dt *= FIRE_SHRINK;
                alpha = FIRE_ALPHA;
                downhill_run = 0;
            }

            let max_step = self.config.max_step_fraction * mean_spacing(&band);
            for i in 1..n - 1 {
                for (vi, fi) in velocity[i].iter_mut().zip(&forces[i]) {
                    *vi += dt * fi;
                }
                let mut step: Vec<f64> = velocity[i].iter().map(|v| dt * v).collect();
                let length = norm(&step);
                if length > max_step && length > 0.0 {
                    step.iter_mut().for_each(|s| *s *= max_step / length);
                }
                for (x, s) in band[i].iter_mut().zip(&step) {
                    *x += s;
                }
                bounds.clamp(&mut band[i]);
                values[i] = potential.value(&band[i]);
            }
        }

        if converged {
            log::debug!("neb converged after {iterations} iterations with {n} images");
            return Ok(NebOutcome {
                band,
                values,
                converged,
                iterations,
                force_constant: k,
            });
        }
        log::debug!("neb did not converge within {iterations} iterations");
        let (band, values) = match best {
            Some((_, band, values)) => (band, values),
            None => (band, values),
        };
        Ok(NebOutcome {
            band,
            values,
            converged,
            iterations,
            force_constant: k,
        })
    }

    fn forces(
        &self,
        potential: &dyn Potential,
        band: &[Vec<f64>],
        values: &[f64],
        k: f64,
    ) -> Vec<Vec<f64>> {
        let n = band.len();
        let mut forces = vec![vec![0.0; band[0].len()]; n];
        for i in 1..n - 1 {
            let tangent = tangent(
                [&band[i - 1], &band[i], &band[i + 1]],
                [values[i - 1], values[i], values[i + 1]],
            );
            let gradient = potential.gradient(&band[i]);
            let along = dot(&gradient, &tangent);
            let spring = k * (distance(&band[i + 1], &band[i]) - distance(&band[i], &band[i - 1]));
            for ((f, g), t) in forces[i].iter_mut().zip(&gradient).zip(&tangent) {
                *f = -(g - along * t) + spring * t;
            }
        }
        forces
    }

    fn spacing_ratio(&self, band: &[Vec<f64>]) -> f64 {
        let lengths: Vec<f64> = band.windows(2).map(|w| distance(&w[0], &w[1])).collect();
        let longest = lengths.iter().copied().fold(0.0, f64::max);
        let shortest = lengths.iter().copied().fold(f64::INFINITY, f64::min);
        if shortest <= 0.0 {
            f64::INFINITY
        } else {
            longest / shortest
        }
    }
}

fn mean_spacing(band: &[Vec<f64>]) -> f64 {
    let total: f64 = band.windows(2).map(|w| distance(&w[0], &w[1])).sum();
    total / (band.len() - 1) as f64
}

/// Energy-weighted upwind tangent at an interior image.
fn tangent(images: [&[f64]; 3], values: [f64; 3]) -> Vec<f64> {
    let [prev, here, next] = images;
    let [v_prev, v_here, v_next] = values;
    let forward = sub(next, here);
    let backward = sub(here, prev);
    let mut tau = if v_next > v_here && v_here > v_prev {
        forward
    } else if v_next < v_here && v_here < v_prev {
        backward
    } else {
        let up = (v_next - v_here).abs().max((v_prev - v_here).abs());
        let down = (v_next - v_here).abs().min((v_prev - v_here).abs());
        let (w_forward, w_backward) = if v_next > v_prev { (up, down) } else { (down, up) };
        let mixed: Vec<f64> = forward
            .iter()
            .zip(&backward)
            .map(|(f, b)| w_forward * f + w_backward * b)
            .collect();
        if norm(&mixed) > 0.0 {
            mixed
        } else {
            sub(next, prev)
        }
    };
    normalize(&mut tau);
    tau
}
