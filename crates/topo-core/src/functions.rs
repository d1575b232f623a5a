//! Analytic test surfaces implementing [`Potential`].
//!
//! These are the surfaces used by the CLI plans and the integration tests;
//! real applications supply their own potentials.

use nalgebra::DMatrix;

use crate::bounds::Bounds;
use crate::errors::{ErrorInfo, TopoError};
use crate::Potential;

const SCHWEFEL_OFFSET: f64 = 418.982_887_272_433_9;

/// Schwefel function on `[-500, 500]^d`.
///
/// Global minimum at `x_i = 420.968746` with value close to zero.
#[derive(Debug, Clone)]
pub struct Schwefel {
    bounds: Bounds,
}

impl Schwefel {
    /// Location of the global minimum along every coordinate.
    pub const MINIMUM_COORDINATE: f64 = 420.968_746_359_982;

    /// Creates the surface in `dimension` coordinates.
    pub fn new(dimension: usize) -> Result<Self, TopoError> {
        Ok(Self {
            bounds: Bounds::uniform(dimension, -500.0, 500.0)?,
        })
    }

    /// Value of the global minimum for this dimension.
    pub fn global_minimum_value(&self) -> f64 {
        let x = vec![Self::MINIMUM_COORDINATE; self.bounds.dimension()];
        self.value(&x)
    }
}

impl Potential for Schwefel {
    fn name(&self) -> &str {
        "schwefel"
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn value(&self, x: &[f64]) -> f64 {
        SCHWEFEL_OFFSET * x.len() as f64 - x.iter().map(|v| v * v.abs().sqrt().sin()).sum::<f64>()
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .map(|v| {
                let s = v.abs().sqrt();
                -(s.sin() + 0.5 * s * s.cos())
            })
            .collect()
    }
}

/// Six-hump camelback on `[-3, 3] x [-2, 2]`.
#[derive(Debug, Clone)]
pub struct Camelback {
    bounds: Bounds,
}

impl Camelback {
    /// Creates the surface.
    pub fn new() -> Self {
        Self {
            bounds: Bounds::from_parts(vec![-3.0, -2.0], vec![3.0, 2.0]),
        }
    }
}

impl Default for Camelback {
    fn default() -> Self {
        Self::new()
    }
}

impl Potential for Camelback {
    fn name(&self) -> &str {
        "camelback"
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn value(&self, x: &[f64]) -> f64 {
        let (a, b) = (x[0], x[1]);
        (4.0 - 2.1 * a * a + a.powi(4) / 3.0) * a * a + a * b + (-4.0 + 4.0 * b * b) * b * b
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        let (a, b) = (x[0], x[1]);
        vec![
            8.0 * a - 8.4 * a.powi(3) + 2.0 * a.powi(5) + b,
            a - 8.0 * b + 16.0 * b.powi(3),
        ]
    }

    fn hessian(&self, x: &[f64]) -> Option<DMatrix<f64>> {
        let (a, b) = (x[0], x[1]);
        Some(DMatrix::from_row_slice(
            2,
            2,
            &[
                8.0 - 25.2 * a * a + 10.0 * a.powi(4),
                1.0,
                1.0,
                -8.0 + 48.0 * b * b,
            ],
        ))
    }
}

/// Symmetric double well `(x0^2 - 1)^2 + stiffness * sum_{i>0} x_i^2` on `[-2, 2]^d`.
///
/// Minima at `x0 = +-1` (value 0), saddle at the origin (value 1).
#[derive(Debug, Clone)]
pub struct DoubleWell {
    bounds: Bounds,
    stiffness: f64,
}

impl DoubleWell {
    /// Creates the surface in `dimension >= 1` coordinates.
    pub fn new(dimension: usize, stiffness: f64) -> Result<Self, TopoError> {
        if stiffness <= 0.0 {
            return Err(TopoError::Potential(
                ErrorInfo::new("invalid-stiffness", "transverse stiffness must be positive")
                    .with_context("stiffness", stiffness.to_string()),
            ));
        }
        Ok(Self {
            bounds: Bounds::uniform(dimension, -2.0, 2.0)?,
            stiffness,
        })
    }
}

impl Potential for DoubleWell {
    fn name(&self) -> &str {
        "double-well"
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn value(&self, x: &[f64]) -> f64 {
        let well = (x[0] * x[0] - 1.0).powi(2);
        well + self.stiffness * x[1..].iter().map(|v| v * v).sum::<f64>()
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        let mut g = Vec::with_capacity(x.len());
        g.push(4.0 * x[0] * (x[0] * x[0] - 1.0));
        g.extend(x[1..].iter().map(|v| 2.0 * self.stiffness * v));
        g
    }

    fn hessian(&self, x: &[f64]) -> Option<DMatrix<f64>> {
        let n = x.len();
        let mut h = DMatrix::<f64>::zeros(n, n);
        h[(0, 0)] = 12.0 * x[0] * x[0] - 4.0;
        for i in 1..n {
            h[(i, i)] = 2.0 * self.stiffness;
        }
        Some(h)
    }
}

/// Separable quadratic bowl `sum_i w_i (x_i - c_i)^2`.
#[derive(Debug, Clone)]
pub struct Quadratic {
    bounds: Bounds,
    centre: Vec<f64>,
    weights: Vec<f64>,
}

impl Quadratic {
    /// Creates a bowl centred at `centre` with positive `weights`.
    pub fn new(bounds: Bounds, centre: Vec<f64>, weights: Vec<f64>) -> Result<Self, TopoError> {
        bounds.check_dimension(&centre)?;
        bounds.check_dimension(&weights)?;
        if weights.iter().any(|w| *w <= 0.0) {
            return Err(TopoError::Potential(ErrorInfo::new(
                "invalid-weights",
                "quadratic weights must be positive",
            )));
        }
        Ok(Self {
            bounds,
            centre,
            weights,
        })
    }
}

impl Potential for Quadratic {
    fn name(&self) -> &str {
        "quadratic"
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn value(&self, x: &[f64]) -> f64 {
        x.iter()
            .zip(&self.centre)
            .zip(&self.weights)
            .map(|((xi, ci), wi)| wi * (xi - ci) * (xi - ci))
            .sum()
    }

    fn gradient(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(&self.centre)
            .zip(&self.weights)
            .map(|((xi, ci), wi)| 2.0 * wi * (xi - ci))
            .collect()
    }

    fn hessian(&self, _x: &[f64]) -> Option<DMatrix<f64>> {
        Some(DMatrix::from_diagonal(&nalgebra::DVector::from_iterator(
            self.weights.len(),
            self.weights.iter().map(|w| 2.0 * w),
        )))
    }
}
