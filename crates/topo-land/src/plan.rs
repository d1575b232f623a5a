use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};
use topo_core::functions::{Camelback, DoubleWell, Quadratic, Schwefel};
use topo_core::{Bounds, LbfgsConfig, Potential};
use topo_network::SimilarityConfig;
use topo_search::{BasinHoppingConfig, HefConfig, NebConfig};

use crate::sampling::SamplingConfig;
use crate::serde::{from_yaml_slice, stable_hash_string, to_yaml_string};

/// Built-in surface to explore, selected by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PotentialSpec {
    /// Schwefel function on `[-500, 500]^dimension`.
    Schwefel {
        /// Number of coordinates.
        dimension: usize,
    },
    /// Six-hump camelback in two dimensions.
    #[default]
    Camelback,
    /// Sum of quartic double wells.
    DoubleWell {
        /// Number of coordinates.
        dimension: usize,
        /// Coupling stiffness between neighbouring coordinates.
        #[serde(default)]
        stiffness: f64,
    },
    /// Weighted quadratic bowl.
    Quadratic {
        /// `(min, max)` per coordinate.
        bounds: Vec<(f64, f64)>,
        /// Location of the minimum.
        centre: Vec<f64>,
        /// Per-coordinate curvature.
        weights: Vec<f64>,
    },
}

impl PotentialSpec {
    /// Instantiates the surface.
    pub fn build(&self) -> Result<Box<dyn Potential>, TopoError> {
        Ok(match self {
            PotentialSpec::Schwefel { dimension } => Box::new(Schwefel::new(*dimension)?),
            PotentialSpec::Camelback => Box::new(Camelback::new()),
            PotentialSpec::DoubleWell {
                dimension,
                stiffness,
            } => Box::new(DoubleWell::new(*dimension, *stiffness)?),
            PotentialSpec::Quadratic {
                bounds,
                centre,
                weights,
            } => Box::new(Quadratic::new(
                Bounds::new(bounds)?,
                centre.clone(),
                weights.clone(),
            )?),
        })
    }
}

/// Where and under which name network files are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputSpec {
    /// Suffix appended to every network file name.
    #[serde(default)]
    pub suffix: String,
}

/// Deterministic exploration plan: one surface, every tunable, and the number
/// of basin-hopping plus landscape cycles to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Master seed; each cycle derives its own substream.
    pub seed: u64,
    /// Surface to explore.
    #[serde(default)]
    pub potential: PotentialSpec,
    /// Deduplication criteria.
    #[serde(default)]
    pub similarity: SimilarityConfig,
    /// Local minimiser settings.
    #[serde(default)]
    pub minimizer: LbfgsConfig,
    /// Global optimisation settings.
    #[serde(default)]
    pub basin_hopping: BasinHoppingConfig,
    /// Path search settings.
    #[serde(default)]
    pub neb: NebConfig,
    /// Saddle refinement settings.
    #[serde(default)]
    pub hef: HefConfig,
    /// Pair selection and parallelism.
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Number of basin-hopping + landscape rounds.
    #[serde(default = "default_cycles")]
    pub cycles: usize,
    /// Output naming.
    #[serde(default)]
    pub output: OutputSpec,
}

fn default_cycles() -> usize {
    1
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            seed: 0,
            potential: PotentialSpec::default(),
            similarity: SimilarityConfig::default(),
            minimizer: LbfgsConfig::default(),
            basin_hopping: BasinHoppingConfig::default(),
            neb: NebConfig::default(),
            hef: HefConfig::default(),
            sampling: SamplingConfig::default(),
            cycles: default_cycles(),
            output: OutputSpec::default(),
        }
    }
}

impl Plan {
    /// Returns the deterministic hash associated with the plan contents.
    pub fn plan_hash(&self) -> Result<String, TopoError> {
        stable_hash_string(self)
    }

    /// Produces a YAML representation of the plan.
    pub fn to_yaml_string(&self) -> Result<String, TopoError> {
        to_yaml_string(self)
    }
}

/// Loads a plan from disk.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Plan, TopoError> {
    let plan_path = path.as_ref();
    let bytes = fs::read(plan_path).map_err(|err| {
        TopoError::Serde(
            ErrorInfo::new("plan-read", err.to_string())
                .with_context("path", plan_path.display().to_string()),
        )
    })?;
    from_yaml_slice(&bytes)
}
