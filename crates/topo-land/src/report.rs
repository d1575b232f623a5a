use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use topo_core::MinimumId;
use topo_network::TsInsertion;

/// Counts of transition-state insertion outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionCounts {
    /// New edges.
    pub inserted: usize,
    /// Saddles matching a stored transition state.
    pub duplicate: usize,
    /// Distinct saddles joining an already connected pair.
    pub pair_connected: usize,
    /// Saddles whose two sides relaxed into the same stored minimum.
    pub self_loop: usize,
}

impl InsertionCounts {
    pub(crate) fn record(&mut self, outcome: &TsInsertion) {
        match outcome {
            TsInsertion::Inserted(_) => self.inserted += 1,
            TsInsertion::Duplicate(_) => self.duplicate += 1,
            TsInsertion::PairConnected(_) => self.pair_connected += 1,
            TsInsertion::SelfLoop => self.self_loop += 1,
        }
    }
}

/// What one pair search produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    /// First endpoint.
    pub a: MinimumId,
    /// Second endpoint.
    pub b: MinimumId,
    /// Whether the band relaxed within its budget.
    pub neb_converged: bool,
    /// Error code when no band could be built for the pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_error: Option<String>,
    /// Path maxima handed to the saddle search.
    pub seeds: usize,
    /// Saddle searches that converged and passed the connection checks.
    pub saddles: usize,
}

/// Outcome of one `generate_landscape` pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandscapeReport {
    /// Per-pair results in candidate order.
    pub pairs: Vec<PairReport>,
    /// Band and saddle search failures keyed by kind or error code.
    pub failures: BTreeMap<String, usize>,
    /// Insertion outcomes of the converged saddles.
    pub insertions: InsertionCounts,
    /// Minima before the pass.
    pub minima_before: usize,
    /// Minima after the pass.
    pub minima_after: usize,
    /// Transition states before the pass.
    pub transition_states_before: usize,
    /// Transition states after the pass.
    pub transition_states_after: usize,
    /// Canonical network hash after the merge.
    pub network_hash: String,
}

impl LandscapeReport {
    /// Number of searches attempted; a pair whose band failed counts once.
    pub fn searches(&self) -> usize {
        self.pairs
            .iter()
            .map(|pair| pair.seeds + usize::from(pair.band_error.is_some()))
            .sum()
    }

    /// Number of failed band and saddle searches.
    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }
}
