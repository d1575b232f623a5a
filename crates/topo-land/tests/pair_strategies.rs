use std::collections::BTreeSet;

use topo_core::{MinimumId, TopoError};
use topo_land::{candidate_pairs, PairStrategy};
use topo_network::{KineticTransitionNetwork, SimilarityComparer};

fn id(raw: u64) -> MinimumId {
    MinimumId::from_raw(raw)
}

/// Minima on a line at 0, 1, 3, 7 and 15; values descend so id 4 is lowest.
fn line_network() -> KineticTransitionNetwork {
    let comparer = SimilarityComparer::absolute(0.1, 0.1, 1).unwrap();
    let mut network = KineticTransitionNetwork::new(comparer);
    for (x, value) in [(0.0, 0.0), (1.0, -1.0), (3.0, -2.0), (7.0, -3.0), (15.0, -4.0)] {
        network.add_minimum(&[x], value).unwrap();
    }
    network
}

fn join(network: &mut KineticTransitionNetwork, a: u64, b: u64, value: f64) {
    let x = network.minimum(id(a)).unwrap().point[0] + 0.5;
    assert!(network
        .add_transition_state(&[x], value, &[1.0], id(a), id(b))
        .unwrap()
        .is_inserted());
}

#[test]
fn closest_enumeration_with_one_neighbour() {
    let network = line_network();
    let pairs = candidate_pairs(&network, &PairStrategy::ClosestEnumeration { k: 1 }).unwrap();
    assert!(pairs.len() <= network.n_minima());
    assert_eq!(pairs, vec![(id(0), id(1)), (id(1), id(2)), (id(2), id(3)), (id(3), id(4))]);
}

#[test]
fn closest_enumeration_skips_connected_pairs() {
    let mut network = line_network();
    join(&mut network, 0, 1, 5.0);
    let pairs = candidate_pairs(&network, &PairStrategy::ClosestEnumeration { k: 1 }).unwrap();
    assert!(pairs.len() <= network.n_minima());
    for &(a, b) in &pairs {
        assert!(!network.are_connected(a, b));
        assert!(a < b);
    }
    let unique: BTreeSet<_> = pairs.iter().copied().collect();
    assert_eq!(unique.len(), pairs.len());
    assert_eq!(pairs[0], (id(0), id(2)));
}

#[test]
fn larger_k_never_repeats_a_pair() {
    let network = line_network();
    let pairs = candidate_pairs(&network, &PairStrategy::ClosestEnumeration { k: 10 }).unwrap();
    assert_eq!(pairs.len(), 10);
    let unique: BTreeSet<_> = pairs.iter().copied().collect();
    assert_eq!(unique.len(), 10);
}

#[test]
fn connect_unconnected_reaches_into_the_global_component() {
    let mut network = line_network();
    join(&mut network, 3, 4, 1.0);
    let pairs = candidate_pairs(&network, &PairStrategy::ConnectUnconnected { k: 1 }).unwrap();
    assert_eq!(pairs, vec![(id(0), id(3)), (id(1), id(3)), (id(2), id(3))]);

    join(&mut network, 2, 3, 1.0);
    join(&mut network, 1, 2, 1.0);
    join(&mut network, 0, 1, 1.0);
    assert!(candidate_pairs(&network, &PairStrategy::ConnectUnconnected { k: 2 })
        .unwrap()
        .is_empty());
}

#[test]
fn explicit_pairs_are_normalised_and_checked() {
    let network = line_network();
    let strategy = PairStrategy::Pairs {
        pairs: vec![(id(3), id(1)), (id(1), id(3)), (id(2), id(2)), (id(0), id(4))],
    };
    let pairs = candidate_pairs(&network, &strategy).unwrap();
    assert_eq!(pairs, vec![(id(1), id(3)), (id(0), id(4))]);

    let unknown = PairStrategy::Pairs {
        pairs: vec![(id(0), id(9))],
    };
    assert!(matches!(
        candidate_pairs(&network, &unknown),
        Err(TopoError::Network(_))
    ));
}

#[test]
fn empty_network_has_no_pairs() {
    let network = KineticTransitionNetwork::new(SimilarityComparer::absolute(0.1, 0.1, 2).unwrap());
    for strategy in [
        PairStrategy::ClosestEnumeration { k: 3 },
        PairStrategy::ConnectUnconnected { k: 3 },
    ] {
        assert!(candidate_pairs(&network, &strategy).unwrap().is_empty());
    }
}
