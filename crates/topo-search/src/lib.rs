#![deny(missing_docs)]

//! Searches over a potential surface: nudged elastic band, hybrid
//! eigenvector-following, perturbation steps and basin hopping.

/// Basin-hopping global optimiser.
pub mod basin_hopping;
/// Serde configuration structs and defaults.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Single-ended saddle search.
pub mod hef;
/// Double-ended path search.
pub mod neb;
/// Random perturbation proposals.
pub mod step_taker;

pub use basin_hopping::{BasinHopping, BasinHoppingSummary};
pub use config::{BasinHoppingConfig, HefConfig, NebConfig, StepTakerConfig};
pub use hef::{HybridEigenvectorFollowing, SearchFailure, SubspacePotential, TransitionStateSearch};
pub use neb::{NebOutcome, NudgedElasticBand};
pub use step_taker::PerturbationStepTaker;
