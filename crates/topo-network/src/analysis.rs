//! Graph queries over a transition network.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};
use topo_core::errors::TopoError;
use topo_core::MinimumId;

use crate::network::KineticTransitionNetwork;

/// Aggregate statistics of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Number of minima.
    pub n_minima: usize,
    /// Number of transition states.
    pub n_transition_states: usize,
    /// Number of connected components (isolated minima count as one each).
    pub n_components: usize,
    /// Size of the component holding the global minimum.
    pub global_component_size: usize,
    /// Id of the lowest minimum.
    pub global_minimum: Option<MinimumId>,
    /// Value of the lowest minimum.
    pub global_minimum_value: Option<f64>,
    /// Lowest transition-state value.
    pub lowest_transition_state: Option<f64>,
    /// Mean number of edges per minimum.
    pub mean_degree: f64,
}

impl KineticTransitionNetwork {
    /// Connected components as sorted id lists, ordered by their smallest id.
    pub fn connected_components(&self) -> Vec<Vec<MinimumId>> {
        let labels = self.component_labels();
        let count = labels.iter().copied().max().map_or(0, |max| max + 1);
        let mut components = vec![Vec::new(); count];
        for minimum in self.minima() {
            components[labels[minimum.id.index()]].push(minimum.id);
        }
        components
    }

    /// Ids in the same component as `id`, including `id`.
    pub fn component_of(&self, id: MinimumId) -> Result<Vec<MinimumId>, TopoError> {
        self.minimum(id)?;
        let labels = self.component_labels();
        let label = labels[id.index()];
        Ok(self
            .minima()
            .iter()
            .filter(|m| labels[m.id.index()] == label)
            .map(|m| m.id)
            .collect())
    }

    /// Lowest possible highest transition state on any path from `a` to `b`.
    ///
    /// Returns `None` when the minima are disconnected and `Some(value of a)`
    /// when `a == b`. This is the barrier a disconnectivity graph joins the
    /// two minima at.
    pub fn minimax_barrier(&self, a: MinimumId, b: MinimumId) -> Result<Option<f64>, TopoError> {
        let start = self.minimum(a)?.value;
        self.minimum(b)?;
        if a == b {
            return Ok(Some(start));
        }
        let mut best = vec![f64::INFINITY; self.n_minima()];
        let mut heap = BinaryHeap::new();
        best[a.index()] = f64::NEG_INFINITY;
        heap.push(Frontier {
            barrier: f64::NEG_INFINITY,
            id: a,
        });
        while let Some(Frontier { barrier, id }) = heap.pop() {
            if id == b {
                return Ok(Some(barrier));
            }
            if barrier > best[id.index()] {
                continue;
            }
            for ts in self.transition_states() {
                let Some(next) = ts.other(id) else {
                    continue;
                };
                if next == id {
                    continue;
                }
                let through = barrier.max(ts.value);
                if through < best[next.index()] {
                    best[next.index()] = through;
                    heap.push(Frontier { barrier: through, id: next });
                }
            }
        }
        Ok(None)
    }

    /// Summary statistics.
    pub fn summary(&self) -> NetworkSummary {
        let components = self.connected_components();
        let global = self.global_minimum();
        let global_component_size = global
            .and_then(|g| components.iter().find(|c| c.contains(&g.id)))
            .map_or(0, Vec::len);
        let lowest_transition_state = self
            .transition_states()
            .iter()
            .map(|ts| ts.value)
            .min_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
        let degree_total: usize = self
            .minima()
            .iter()
            .map(|m| self.neighbours(m.id).map_or(0, |n| n.len()))
            .sum();
        NetworkSummary {
            n_minima: self.n_minima(),
            n_transition_states: self.n_transition_states(),
            n_components: components.len(),
            global_component_size,
            global_minimum: global.map(|m| m.id),
            global_minimum_value: global.map(|m| m.value),
            lowest_transition_state,
            mean_degree: if self.n_minima() == 0 {
                0.0
            } else {
                degree_total as f64 / self.n_minima() as f64
            },
        }
    }

    fn component_labels(&self) -> Vec<usize> {
        let mut labels = vec![usize::MAX; self.n_minima()];
        let mut next = 0;
        for root in 0..self.n_minima() {
            if labels[root] != usize::MAX {
                continue;
            }
            labels[root] = next;
            let mut queue = VecDeque::from([MinimumId::from_raw(root as u64)]);
            while let Some(current) = queue.pop_front() {
                for neighbour in self.neighbours(current).unwrap_or_default() {
                    if labels[neighbour.index()] == usize::MAX {
                        labels[neighbour.index()] = next;
                        queue.push_back(neighbour);
                    }
                }
            }
            next += 1;
        }
        labels
    }
}

#[derive(Debug, Clone, Copy)]
struct Frontier {
    barrier: f64,
    id: MinimumId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed so the max-heap pops the lowest barrier first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .barrier
            .total_cmp(&self.barrier)
            .then_with(|| other.id.cmp(&self.id))
    }
}
