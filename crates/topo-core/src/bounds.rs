use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TopoError};

/// Axis-aligned box describing the domain of a [`Potential`](crate::Potential).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Builds bounds from `(min, max)` pairs, one per dimension.
    pub fn new(limits: &[(f64, f64)]) -> Result<Self, TopoError> {
        if limits.is_empty() {
            return Err(TopoError::Potential(ErrorInfo::new(
                "empty-bounds",
                "a domain needs at least one dimension",
            )));
        }
        let mut lower = Vec::with_capacity(limits.len());
        let mut upper = Vec::with_capacity(limits.len());
        for (dim, &(lo, hi)) in limits.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(TopoError::Potential(
                    ErrorInfo::new("invalid-bounds", "bounds must be finite with min <= max")
                        .with_context("dimension", dim.to_string())
                        .with_context("min", lo.to_string())
                        .with_context("max", hi.to_string()),
                ));
            }
            lower.push(lo);
            upper.push(hi);
        }
        Ok(Self { lower, upper })
    }

    pub(crate) fn from_parts(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self { lower, upper }
    }

    /// Same box repeated over `dimension` coordinates.
    pub fn uniform(dimension: usize, lo: f64, hi: f64) -> Result<Self, TopoError> {
        Self::new(&vec![(lo, hi); dimension])
    }

    /// Number of coordinates in the domain.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Lower limits per dimension.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper limits per dimension.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Width of every dimension.
    pub fn ranges(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| hi - lo)
            .collect()
    }

    /// Mean width over all dimensions.
    pub fn mean_range(&self) -> f64 {
        let ranges = self.ranges();
        ranges.iter().sum::<f64>() / ranges.len() as f64
    }

    /// Midpoint of the box.
    pub fn centre(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| 0.5 * (lo + hi))
            .collect()
    }

    /// Clamps `point` into the box in place.
    pub fn clamp(&self, point: &mut [f64]) {
        for ((x, lo), hi) in point.iter_mut().zip(&self.lower).zip(&self.upper) {
            *x = x.clamp(*lo, *hi);
        }
    }

    /// Returns a clamped copy of `point`.
    pub fn clamped(&self, point: &[f64]) -> Vec<f64> {
        let mut out = point.to_vec();
        self.clamp(&mut out);
        out
    }

    /// True when every coordinate lies inside the box.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dimension()
            && point
                .iter()
                .zip(&self.lower)
                .zip(&self.upper)
                .all(|((x, lo), hi)| *x >= *lo && *x <= *hi)
    }

    /// True when any coordinate lies within `tolerance` of a face of the box.
    pub fn at_bounds(&self, point: &[f64], tolerance: f64) -> bool {
        point
            .iter()
            .zip(&self.lower)
            .zip(&self.upper)
            .any(|((x, lo), hi)| (x - lo).abs() <= tolerance || (hi - x).abs() <= tolerance)
    }

    /// Errors unless `point` has the domain's dimension.
    pub fn check_dimension(&self, point: &[f64]) -> Result<(), TopoError> {
        if point.len() != self.dimension() {
            return Err(TopoError::dimension_mismatch(self.dimension(), point.len()));
        }
        Ok(())
    }
}
