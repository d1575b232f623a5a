#![deny(missing_docs)]
#![doc = "Landscape exploration for topograph: pair selection, parallel saddle searches, plans and run artefacts."]

/// Ordered parallel map over independent tasks.
pub mod dispatch;
/// Plan execution and run artefacts.
pub mod explore;
/// Run manifests.
pub mod manifest;
/// Candidate pair strategies.
pub mod pairs;
/// Deterministic plan loading.
pub mod plan;
/// Landscape pass reports.
pub mod report;
/// The sampling orchestrator.
pub mod sampling;
/// Canonical JSON, YAML and hashing helpers.
pub mod serde;

pub use dispatch::map_ordered;
pub use explore::{run_plan, run_plan_from_path, CycleReport, ExploreReport};
pub use manifest::RunManifest;
pub use pairs::{candidate_pairs, PairStrategy};
pub use plan::{load_plan, OutputSpec, Plan, PotentialSpec};
pub use report::{InsertionCounts, LandscapeReport, PairReport};
pub use sampling::{NetworkSampling, SamplingConfig};
