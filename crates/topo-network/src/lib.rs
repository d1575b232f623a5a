#![deny(missing_docs)]

//! Transition network store for topograph: similarity-based deduplication of
//! stationary points, the minima/transition-state graph, persistence,
//! canonical hashing and barrier analysis.

mod analysis;
mod hash;
mod network;
mod persistence;
mod serialization;
mod similarity;

pub use analysis::NetworkSummary;
pub use hash::{canonical_hash, HASH_QUANTUM};
pub use network::{KineticTransitionNetwork, Minimum, TransitionState, TsInsertion};
pub use persistence::NETWORK_FILES;
pub use serialization::{
    network_from_bytes, network_from_json, network_to_bytes, network_to_json, NETWORK_SCHEMA,
};
pub use similarity::{SimilarityComparer, SimilarityConfig};
