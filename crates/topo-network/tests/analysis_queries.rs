use topo_core::MinimumId;
use topo_network::{KineticTransitionNetwork, SimilarityComparer};

fn id(raw: u64) -> MinimumId {
    MinimumId::from_raw(raw)
}

/// Chain 0-1-2 with barriers 5 and 2, a detour 0-3-2 with barriers 3 and 4,
/// and an isolated minimum 4.
fn landscape() -> KineticTransitionNetwork {
    let mut network =
        KineticTransitionNetwork::new(SimilarityComparer::absolute(0.1, 1e-3, 2).unwrap());
    let values = [0.0, 1.0, -1.0, 0.5, 2.0];
    for (i, value) in values.iter().enumerate() {
        network.add_minimum(&[i as f64 * 10.0, 0.0], *value).unwrap();
    }
    for (k, (a, b, barrier)) in [(0, 1, 5.0), (1, 2, 2.0), (0, 3, 3.0), (3, 2, 4.0)]
        .into_iter()
        .enumerate()
    {
        network
            .add_transition_state(&[k as f64 * 10.0 + 5.0, 1.0], barrier, &[], id(a), id(b))
            .unwrap();
    }
    network
}

#[test]
fn components_and_membership() {
    let network = landscape();
    let components = network.connected_components();
    assert_eq!(components, vec![vec![id(0), id(1), id(2), id(3)], vec![id(4)]]);
    assert_eq!(network.component_of(id(4)).unwrap(), vec![id(4)]);
    assert!(network.component_of(id(42)).is_err());
}

#[test]
fn minimax_barrier_takes_the_lowest_ceiling() {
    let network = landscape();
    assert_eq!(network.minimax_barrier(id(0), id(2)).unwrap(), Some(4.0));
    assert_eq!(network.minimax_barrier(id(1), id(3)).unwrap(), Some(4.0));
    assert_eq!(network.minimax_barrier(id(1), id(2)).unwrap(), Some(2.0));
    assert_eq!(network.minimax_barrier(id(2), id(2)).unwrap(), Some(-1.0));
    assert_eq!(network.minimax_barrier(id(0), id(4)).unwrap(), None);
}

#[test]
fn summary_reports_global_component() {
    let summary = landscape().summary();
    assert_eq!(summary.n_minima, 5);
    assert_eq!(summary.n_transition_states, 4);
    assert_eq!(summary.n_components, 2);
    assert_eq!(summary.global_minimum, Some(id(2)));
    assert_eq!(summary.global_minimum_value, Some(-1.0));
    assert_eq!(summary.global_component_size, 4);
    assert_eq!(summary.lowest_transition_state, Some(2.0));
    assert!((summary.mean_degree - 8.0 / 5.0).abs() < 1e-12);
}
