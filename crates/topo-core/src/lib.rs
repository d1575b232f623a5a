#![deny(missing_docs)]
#![doc = "Core contracts and shared types for topograph: potentials, bounds, local minimisation, identifiers, errors and deterministic randomness."]

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

mod bounds;
pub mod errors;
pub mod functions;
pub mod hessian;
pub mod linalg;
pub mod minimize;
pub mod provenance;
pub mod rng;

pub use bounds::Bounds;
pub use errors::{ErrorInfo, TopoError};
pub use hessian::{curvature, finite_difference_hessian, hessian_at, Curvature};
pub use minimize::{Lbfgs, LbfgsConfig, LocalMinimizer, Minimization};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a minimum stored in a transition network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MinimumId(u64);

impl MinimumId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Position of the minimum in insertion order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a transition state (edge) stored in a transition network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionStateId(u64);

impl TransitionStateId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Position of the transition state in insertion order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Capability contract for any differentiable surface explored by topograph.
///
/// Test functions, likelihood surfaces and acquisition surfaces all plug in
/// behind the same value/gradient/Hessian operations. Implementations must be
/// `Send + Sync` because landscape generation evaluates them from a worker
/// pool.
pub trait Potential: Send + Sync {
    /// Human readable identifier recorded in manifests.
    fn name(&self) -> &str {
        "potential"
    }

    /// Coordinate bounds of the domain.
    fn bounds(&self) -> &Bounds;

    /// Potential value at `x`.
    fn value(&self, x: &[f64]) -> f64;

    /// Gradient at `x`.
    fn gradient(&self, x: &[f64]) -> Vec<f64>;

    /// Value and gradient in one call; override when both share work.
    fn value_and_gradient(&self, x: &[f64]) -> (f64, Vec<f64>) {
        (self.value(x), self.gradient(x))
    }

    /// Analytic Hessian, when the surface provides one.
    fn hessian(&self, _x: &[f64]) -> Option<DMatrix<f64>> {
        None
    }

    /// Number of coordinates.
    fn dimension(&self) -> usize {
        self.bounds().dimension()
    }
}
