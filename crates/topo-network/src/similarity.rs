use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};
use topo_core::linalg::distance;
use topo_core::Bounds;

/// User facing similarity thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Maximum coordinate distance for two points to be the same.
    #[serde(default = "default_distance_criterion")]
    pub distance_criterion: f64,
    /// Maximum value difference for two points to be the same.
    #[serde(default = "default_energy_criterion")]
    pub energy_criterion: f64,
    /// Interpret `distance_criterion` as a fraction of the domain range.
    #[serde(default)]
    pub proportional_distance: bool,
}

fn default_distance_criterion() -> f64 {
    0.05
}

fn default_energy_criterion() -> f64 {
    1e-2
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            distance_criterion: default_distance_criterion(),
            energy_criterion: default_energy_criterion(),
            proportional_distance: true,
        }
    }
}

/// Decides whether two stationary points are the same object.
///
/// Two points match when their values differ by less than the energy
/// criterion and their Euclidean distance is below the distance criterion.
/// A proportional distance criterion is resolved against the mean range of
/// the domain once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityComparer {
    dimension: usize,
    distance_criterion: f64,
    energy_criterion: f64,
}

impl SimilarityComparer {
    /// Builds a comparer for the domain described by `bounds`.
    pub fn new(config: &SimilarityConfig, bounds: &Bounds) -> Result<Self, TopoError> {
        let distance_criterion = if config.proportional_distance {
            config.distance_criterion * bounds.mean_range()
        } else {
            config.distance_criterion
        };
        Self::absolute(distance_criterion, config.energy_criterion, bounds.dimension())
    }

    /// Builds a comparer from absolute thresholds.
    pub fn absolute(
        distance_criterion: f64,
        energy_criterion: f64,
        dimension: usize,
    ) -> Result<Self, TopoError> {
        if !(distance_criterion > 0.0 && distance_criterion.is_finite())
            || !(energy_criterion > 0.0 && energy_criterion.is_finite())
        {
            return Err(TopoError::Config(
                ErrorInfo::new("similarity-criteria", "similarity criteria must be positive")
                    .with_context("distance_criterion", distance_criterion.to_string())
                    .with_context("energy_criterion", energy_criterion.to_string()),
            ));
        }
        if dimension == 0 {
            return Err(TopoError::Config(ErrorInfo::new(
                "similarity-dimension",
                "comparer dimension must be positive",
            )));
        }
        Ok(Self {
            dimension,
            distance_criterion,
            energy_criterion,
        })
    }

    /// Dimension of the points this comparer accepts.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Absolute distance threshold.
    pub fn distance_criterion(&self) -> f64 {
        self.distance_criterion
    }

    /// Value threshold.
    pub fn energy_criterion(&self) -> f64 {
        self.energy_criterion
    }

    /// Metric used for similarity and nearest-neighbour queries.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        distance(a, b)
    }

    /// True when the two stationary points are the same.
    pub fn is_same(&self, point_a: &[f64], value_a: f64, point_b: &[f64], value_b: f64) -> bool {
        (value_a - value_b).abs() < self.energy_criterion
            && self.distance(point_a, point_b) < self.distance_criterion
    }
}
