use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use topo_core::errors::TopoError;
use topo_core::MinimumId;
use topo_network::{KineticTransitionNetwork, Minimum};

/// Rule for choosing which minima pairs receive a path search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PairStrategy {
    /// Every minimum with its `k` nearest minima it is not yet joined to.
    ClosestEnumeration {
        /// Neighbours per minimum.
        k: usize,
    },
    /// Every minimum outside the global minimum's component with its `k`
    /// nearest minima inside it.
    ConnectUnconnected {
        /// Neighbours per stray minimum.
        k: usize,
    },
    /// An explicit list.
    Pairs {
        /// Pairs to search, in order.
        pairs: Vec<(MinimumId, MinimumId)>,
    },
}

impl Default for PairStrategy {
    fn default() -> Self {
        PairStrategy::ClosestEnumeration { k: 3 }
    }
}

/// Builds the ordered candidate list for one landscape pass.
///
/// Pairs are normalised to `(smaller, larger)` and never repeat; self pairs
/// are dropped.
pub fn candidate_pairs(
    network: &KineticTransitionNetwork,
    strategy: &PairStrategy,
) -> Result<Vec<(MinimumId, MinimumId)>, TopoError> {
    let mut collector = PairCollector::default();
    match strategy {
        PairStrategy::ClosestEnumeration { k } => {
            for minimum in network.minima() {
                let pool = network
                    .minima()
                    .iter()
                    .filter(|m| m.id != minimum.id && !network.are_connected(minimum.id, m.id));
                for other in nearest(network, minimum, pool, *k) {
                    collector.push(minimum.id, other);
                }
            }
        }
        PairStrategy::ConnectUnconnected { k } => {
            let Some(global) = network.global_minimum() else {
                return Ok(Vec::new());
            };
            let inside: BTreeSet<MinimumId> =
                network.component_of(global.id)?.into_iter().collect();
            for minimum in network.minima().iter().filter(|m| !inside.contains(&m.id)) {
                let pool = network.minima().iter().filter(|m| inside.contains(&m.id));
                for other in nearest(network, minimum, pool, *k) {
                    collector.push(minimum.id, other);
                }
            }
        }
        PairStrategy::Pairs { pairs } => {
            for &(a, b) in pairs {
                network.minimum(a)?;
                network.minimum(b)?;
                if a == b {
                    log::warn!("dropping self pair ({}, {})", a.as_raw(), b.as_raw());
                    continue;
                }
                collector.push(a, b);
            }
        }
    }
    Ok(collector.pairs)
}

fn nearest<'a>(
    network: &KineticTransitionNetwork,
    from: &Minimum,
    pool: impl Iterator<Item = &'a Minimum>,
    k: usize,
) -> Vec<MinimumId> {
    let comparer = network.comparer();
    let mut ranked: Vec<(f64, MinimumId)> = pool
        .map(|m| (comparer.distance(&from.point, &m.point), m.id))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked.into_iter().take(k).map(|(_, id)| id).collect()
}

#[derive(Default)]
struct PairCollector {
    seen: BTreeSet<(MinimumId, MinimumId)>,
    pairs: Vec<(MinimumId, MinimumId)>,
}

impl PairCollector {
    fn push(&mut self, a: MinimumId, b: MinimumId) {
        let key = if a <= b { (a, b) } else { (b, a) };
        if self.seen.insert(key) {
            self.pairs.push(key);
        }
    }
}
