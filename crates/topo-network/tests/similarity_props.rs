use proptest::prelude::*;
use topo_core::Bounds;
use topo_network::{KineticTransitionNetwork, SimilarityComparer, SimilarityConfig};

fn point() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-500.0f64..500.0, 2)
}

#[test]
fn proportional_distance_uses_mean_range() {
    let bounds = Bounds::uniform(2, -500.0, 500.0).unwrap();
    let config = SimilarityConfig {
        distance_criterion: 0.05,
        energy_criterion: 1e-2,
        proportional_distance: true,
    };
    let comparer = SimilarityComparer::new(&config, &bounds).unwrap();
    assert!((comparer.distance_criterion() - 50.0).abs() < 1e-12);
    assert_eq!(comparer.energy_criterion(), 1e-2);

    let absolute = SimilarityConfig {
        proportional_distance: false,
        ..config
    };
    let comparer = SimilarityComparer::new(&absolute, &bounds).unwrap();
    assert_eq!(comparer.distance_criterion(), 0.05);
}

#[test]
fn both_criteria_must_hold() {
    let comparer = SimilarityComparer::absolute(1.0, 0.1, 2).unwrap();
    assert!(comparer.is_same(&[0.0, 0.0], 1.0, &[0.5, 0.5], 1.05));
    assert!(!comparer.is_same(&[0.0, 0.0], 1.0, &[0.5, 0.5], 1.2));
    assert!(!comparer.is_same(&[0.0, 0.0], 1.0, &[2.0, 0.0], 1.0));
}

#[test]
fn non_positive_criteria_are_rejected() {
    assert!(SimilarityComparer::absolute(0.0, 0.1, 2).is_err());
    assert!(SimilarityComparer::absolute(1.0, -1.0, 2).is_err());
    assert!(SimilarityComparer::absolute(1.0, f64::NAN, 2).is_err());
}

proptest! {
    #[test]
    fn comparer_is_symmetric(
        a in point(),
        b in point(),
        va in -10.0f64..10.0,
        vb in -10.0f64..10.0,
    ) {
        let comparer = SimilarityComparer::absolute(50.0, 1.0, 2).unwrap();
        prop_assert_eq!(comparer.is_same(&a, va, &b, vb), comparer.is_same(&b, vb, &a, va));
    }

    #[test]
    fn repeated_insertion_is_idempotent(
        points in prop::collection::vec((point(), -10.0f64..10.0), 1..20),
    ) {
        let comparer = SimilarityComparer::absolute(50.0, 1e-2, 2).unwrap();
        let mut network = KineticTransitionNetwork::new(comparer);
        let first: Vec<_> = points
            .iter()
            .map(|(p, v)| network.add_minimum(p, *v).unwrap())
            .collect();
        let count = network.n_minima();
        let second: Vec<_> = points
            .iter()
            .map(|(p, v)| network.add_minimum(p, *v).unwrap())
            .collect();
        prop_assert_eq!(first, second);
        prop_assert_eq!(network.n_minima(), count);
    }
}
