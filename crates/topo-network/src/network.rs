use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};
use topo_core::{MinimumId, TransitionStateId};

use crate::similarity::SimilarityComparer;

/// Local minimum accepted into the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimum {
    /// Stable identifier (position in insertion order).
    pub id: MinimumId,
    /// Bounds-clamped coordinates.
    pub point: Vec<f64>,
    /// Potential value at `point`.
    pub value: f64,
}

/// First-order saddle connecting two minima.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionState {
    /// Stable identifier (position in insertion order).
    pub id: TransitionStateId,
    /// Saddle coordinates.
    pub point: Vec<f64>,
    /// Potential value at the saddle; the edge weight.
    pub value: f64,
    /// Hessian eigenvector of the negative eigenvalue. Empty when unknown.
    pub eigenvector: Vec<f64>,
    /// The two minima joined by this saddle, smaller id first.
    pub minima: (MinimumId, MinimumId),
}

impl TransitionState {
    /// Returns the minimum on the other side of the edge, if `from` is an endpoint.
    pub fn other(&self, from: MinimumId) -> Option<MinimumId> {
        match self.minima {
            (a, b) if a == from => Some(b),
            (a, b) if b == from => Some(a),
            _ => None,
        }
    }
}

/// Result of offering a transition state to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TsInsertion {
    /// A new edge was created.
    Inserted(TransitionStateId),
    /// A similar transition state is already stored.
    Duplicate(TransitionStateId),
    /// The two minima are already joined by the given edge.
    PairConnected(TransitionStateId),
    /// Both endpoints are the same minimum; nothing was stored.
    SelfLoop,
}

impl TsInsertion {
    /// True when the call created a new edge.
    pub fn is_inserted(&self) -> bool {
        matches!(self, TsInsertion::Inserted(_))
    }
}

/// Weighted graph of minima (nodes) and transition states (edges).
///
/// Every insertion is deduplicated through the [`SimilarityComparer`]; ties
/// resolve to the first inserted instance. Stored objects are never mutated
/// and are only removed by [`KineticTransitionNetwork::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct KineticTransitionNetwork {
    comparer: SimilarityComparer,
    minima: Vec<Minimum>,
    transition_states: Vec<TransitionState>,
    edges: BTreeMap<(MinimumId, MinimumId), TransitionStateId>,
    adjacency: Vec<BTreeSet<MinimumId>>,
}

fn edge_key(a: MinimumId, b: MinimumId) -> (MinimumId, MinimumId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl KineticTransitionNetwork {
    /// Creates an empty network deduplicating with `comparer`.
    pub fn new(comparer: SimilarityComparer) -> Self {
        Self {
            comparer,
            minima: Vec::new(),
            transition_states: Vec::new(),
            edges: BTreeMap::new(),
            adjacency: Vec::new(),
        }
    }

    /// Comparer used for deduplication and distances.
    pub fn comparer(&self) -> &SimilarityComparer {
        &self.comparer
    }

    /// Dimension of stored points.
    pub fn dimension(&self) -> usize {
        self.comparer.dimension()
    }

    /// Number of minima.
    pub fn n_minima(&self) -> usize {
        self.minima.len()
    }

    /// Number of transition states.
    pub fn n_transition_states(&self) -> usize {
        self.transition_states.len()
    }

    /// All minima in id order.
    pub fn minima(&self) -> &[Minimum] {
        &self.minima
    }

    /// All transition states in id order.
    pub fn transition_states(&self) -> &[TransitionState] {
        &self.transition_states
    }

    /// Looks up a minimum.
    pub fn minimum(&self, id: MinimumId) -> Result<&Minimum, TopoError> {
        self.minima.get(id.index()).ok_or_else(|| unknown_minimum(id))
    }

    /// Looks up a transition state.
    pub fn transition_state(&self, id: TransitionStateId) -> Result<&TransitionState, TopoError> {
        self.transition_states.get(id.index()).ok_or_else(|| {
            TopoError::Network(
                ErrorInfo::new("unknown-transition-state", "transition state id is not stored")
                    .with_context("id", id.as_raw().to_string()),
            )
        })
    }

    /// Returns the first stored minimum similar to `(point, value)`.
    pub fn find_minimum(&self, point: &[f64], value: f64) -> Option<MinimumId> {
        self.minima
            .iter()
            .find(|m| self.comparer.is_same(point, value, &m.point, m.value))
            .map(|m| m.id)
    }

    /// Returns the first stored transition state similar to `(point, value)`.
    pub fn find_transition_state(&self, point: &[f64], value: f64) -> Option<TransitionStateId> {
        self.transition_states
            .iter()
            .find(|ts| self.comparer.is_same(point, value, &ts.point, ts.value))
            .map(|ts| ts.id)
    }

    /// Inserts a minimum unless a similar one exists; returns the id either way.
    pub fn add_minimum(&mut self, point: &[f64], value: f64) -> Result<MinimumId, TopoError> {
        self.check_point(point)?;
        if let Some(existing) = self.find_minimum(point, value) {
            return Ok(existing);
        }
        Ok(self.push_minimum(point.to_vec(), value))
    }

    /// Offers a transition state joining `id_a` and `id_b`.
    ///
    /// At most one edge joins a pair: the first transition state inserted for
    /// it is kept, even when a later one has a lower value, so edge weights
    /// and `minimax_barrier` are upper bounds on the true barrier.
    pub fn add_transition_state(
        &mut self,
        point: &[f64],
        value: f64,
        eigenvector: &[f64],
        id_a: MinimumId,
        id_b: MinimumId,
    ) -> Result<TsInsertion, TopoError> {
        self.check_point(point)?;
        self.minimum(id_a)?;
        self.minimum(id_b)?;
        if id_a == id_b {
            return Ok(TsInsertion::SelfLoop);
        }
        if let Some(existing) = self.find_transition_state(point, value) {
            return Ok(TsInsertion::Duplicate(existing));
        }
        if let Some(existing) = self.edge_between(id_a, id_b) {
            return Ok(TsInsertion::PairConnected(existing));
        }
        let id =
            self.push_transition_state(point.to_vec(), value, eigenvector.to_vec(), id_a, id_b);
        Ok(TsInsertion::Inserted(id))
    }

    /// Edge joining two minima, if any.
    pub fn edge_between(&self, a: MinimumId, b: MinimumId) -> Option<TransitionStateId> {
        self.edges.get(&edge_key(a, b)).copied()
    }

    /// True when the two minima share an edge.
    pub fn are_connected(&self, a: MinimumId, b: MinimumId) -> bool {
        self.edges.contains_key(&edge_key(a, b))
    }

    /// Minima directly joined to `id`, in id order.
    pub fn neighbours(&self, id: MinimumId) -> Result<Vec<MinimumId>, TopoError> {
        self.minimum(id)?;
        Ok(self.adjacency[id.index()].iter().copied().collect())
    }

    /// Minimum with the lowest value; the earliest wins ties.
    pub fn global_minimum(&self) -> Option<&Minimum> {
        self.minima.iter().fold(None, |best: Option<&Minimum>, m| match best {
            Some(b) if b.value <= m.value => Some(b),
            _ => Some(m),
        })
    }

    /// Edges as `(a, b, transition state)` sorted by endpoint pair.
    pub fn edges(&self) -> impl Iterator<Item = (MinimumId, MinimumId, TransitionStateId)> + '_ {
        self.edges.iter().map(|(&(a, b), &ts)| (a, b, ts))
    }

    /// Removes every minimum and transition state.
    pub fn reset(&mut self) {
        log::info!(
            "resetting network with {} minima and {} transition states",
            self.minima.len(),
            self.transition_states.len()
        );
        self.minima.clear();
        self.transition_states.clear();
        self.edges.clear();
        self.adjacency.clear();
    }

    /// Rebuilds a network verbatim from stored records, without similarity
    /// deduplication.
    ///
    /// Minimum ids are positions in `minima`; each transition state names its
    /// endpoints by those positions. Self loops and a second record for an
    /// already joined pair are rejected, as `add_transition_state` never
    /// stores either.
    pub(crate) fn restore(
        comparer: SimilarityComparer,
        minima: Vec<(Vec<f64>, f64)>,
        transition_states: Vec<RawTransitionState>,
    ) -> Result<Self, TopoError> {
        let mut network = Self::new(comparer);
        let dimension = network.dimension();
        for (idx, (point, value)) in minima.into_iter().enumerate() {
            if point.len() != dimension {
                return Err(corrupt("minimum", idx, dimension, point.len()));
            }
            network.push_minimum(point, value);
        }
        for (idx, raw) in transition_states.into_iter().enumerate() {
            if raw.point.len() != dimension {
                return Err(corrupt("transition-state", idx, dimension, raw.point.len()));
            }
            if !raw.eigenvector.is_empty() && raw.eigenvector.len() != dimension {
                return Err(corrupt("mode", idx, dimension, raw.eigenvector.len()));
            }
            let n = network.minima.len() as u64;
            if raw.minima.0 >= n || raw.minima.1 >= n {
                return Err(TopoError::Serde(
                    pair_info(
                        "bad-minimum-index",
                        "transition state references a missing minimum",
                        idx,
                        raw.minima,
                    )
                    .with_context("minima", n.to_string()),
                ));
            }
            let (a, b) = (MinimumId::from_raw(raw.minima.0), MinimumId::from_raw(raw.minima.1));
            if a == b {
                return Err(TopoError::Serde(pair_info(
                    "self-loop-pair",
                    "transition state joins a minimum to itself",
                    idx,
                    raw.minima,
                )));
            }
            if network.are_connected(a, b) {
                return Err(TopoError::Serde(pair_info(
                    "duplicate-pair",
                    "two transition states join the same minima",
                    idx,
                    raw.minima,
                )));
            }
            network.push_transition_state(raw.point, raw.value, raw.eigenvector, a, b);
        }
        Ok(network)
    }

    fn push_minimum(&mut self, point: Vec<f64>, value: f64) -> MinimumId {
        let id = MinimumId::from_raw(self.minima.len() as u64);
        self.minima.push(Minimum { id, point, value });
        self.adjacency.push(BTreeSet::new());
        id
    }

    fn push_transition_state(
        &mut self,
        point: Vec<f64>,
        value: f64,
        eigenvector: Vec<f64>,
        a: MinimumId,
        b: MinimumId,
    ) -> TransitionStateId {
        let id = TransitionStateId::from_raw(self.transition_states.len() as u64);
        let minima = edge_key(a, b);
        self.transition_states.push(TransitionState {
            id,
            point,
            value,
            eigenvector,
            minima,
        });
        self.edges.entry(minima).or_insert(id);
        if a != b {
            self.adjacency[a.index()].insert(b);
            self.adjacency[b.index()].insert(a);
        }
        id
    }

    fn check_point(&self, point: &[f64]) -> Result<(), TopoError> {
        if point.len() != self.dimension() {
            return Err(TopoError::dimension_mismatch(self.dimension(), point.len()));
        }
        Ok(())
    }
}

/// Transition state record as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawTransitionState {
    pub point: Vec<f64>,
    pub value: f64,
    pub eigenvector: Vec<f64>,
    pub minima: (u64, u64),
}

fn unknown_minimum(id: MinimumId) -> TopoError {
    TopoError::Network(
        ErrorInfo::new("unknown-minimum", "minimum id is not stored")
            .with_context("id", id.as_raw().to_string()),
    )
}

fn pair_info(code: &str, message: &str, idx: usize, pair: (u64, u64)) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("transition_state", idx.to_string())
        .with_context("pair", format!("{} {}", pair.0, pair.1))
}

fn corrupt(kind: &str, idx: usize, expected: usize, found: usize) -> TopoError {
    TopoError::Serde(
        ErrorInfo::new("record-dimension", "stored record has the wrong dimension")
            .with_context("kind", kind)
            .with_context("index", idx.to_string())
            .with_context("expected", expected.to_string())
            .with_context("found", found.to_string()),
    )
}
