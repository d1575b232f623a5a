use topo_core::functions::{Quadratic, Schwefel};
use topo_core::{Bounds, Lbfgs, Potential, RngHandle};
use topo_network::{KineticTransitionNetwork, SimilarityComparer, SimilarityConfig};
use topo_search::{BasinHopping, BasinHoppingConfig, StepTakerConfig};

fn network_for(potential: &dyn Potential, config: &SimilarityConfig) -> KineticTransitionNetwork {
    KineticTransitionNetwork::new(SimilarityComparer::new(config, potential.bounds()).unwrap())
}

#[test]
fn zero_temperature_walk_never_goes_uphill() {
    let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
    let bowl = Quadratic::new(bounds, vec![1.0, -2.0], vec![1.0, 3.0]).unwrap();
    let mut network = network_for(&bowl, &SimilarityConfig::default());
    let hopping = BasinHopping::new(BasinHoppingConfig {
        n_steps: 40,
        temperature: 0.0,
        ..BasinHoppingConfig::default()
    })
    .unwrap();
    let mut rng = RngHandle::from_seed(11);
    let summary = hopping
        .run(&mut network, &bowl, &Lbfgs::default(), Some(&[4.0, 4.0]), &mut rng)
        .unwrap();

    assert_eq!(summary.n_steps, 40);
    assert_eq!(summary.accepted + summary.rejected + summary.invalid, 40);
    assert!(summary
        .accepted_values
        .windows(2)
        .all(|pair| pair[1] <= pair[0]));
    assert_eq!(network.n_minima(), 1);
    let best = summary.best_point.unwrap();
    assert!((best[0] - 1.0).abs() < 1e-4 && (best[1] + 2.0).abs() < 1e-4);
}

#[test]
fn same_seed_gives_same_walk() {
    let schwefel = Schwefel::new(2).unwrap();
    let config = BasinHoppingConfig {
        n_steps: 60,
        temperature: 50.0,
        ..BasinHoppingConfig::default()
    };
    let hopping = BasinHopping::new(config).unwrap();
    let run = |seed| {
        let mut network = network_for(&schwefel, &SimilarityConfig::default());
        let mut rng = RngHandle::from_seed(seed);
        let summary = hopping
            .run(&mut network, &schwefel, &Lbfgs::default(), None, &mut rng)
            .unwrap();
        (summary, topo_network::canonical_hash(&network))
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn schwefel_global_minimum_is_found() {
    let schwefel = Schwefel::new(2).unwrap();
    let similarity = SimilarityConfig {
        distance_criterion: 0.05,
        energy_criterion: 1e-2,
        proportional_distance: true,
    };
    let mut network = network_for(&schwefel, &similarity);
    assert!((network.comparer().distance_criterion() - 50.0).abs() < 1e-9);

    let hopping = BasinHopping::new(BasinHoppingConfig {
        n_steps: 750,
        temperature: 100.0,
        step: StepTakerConfig {
            max_displacement: 0.4,
            proportional: true,
        },
        ..BasinHoppingConfig::default()
    })
    .unwrap();
    let mut rng = RngHandle::from_seed(2024);
    let summary = hopping
        .run(&mut network, &schwefel, &Lbfgs::default(), None, &mut rng)
        .unwrap();

    let target = schwefel.global_minimum_value();
    let lowest = network.global_minimum().unwrap().value;
    assert!(
        (lowest - target).abs() < 0.1,
        "lowest {lowest} vs global {target}"
    );
    assert_eq!(summary.best_value, Some(lowest));
    assert!(network.n_minima() > 5);
}

#[test]
fn adaptive_step_changes_displacement() {
    let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
    let bowl = Quadratic::new(bounds, vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
    let mut network = network_for(&bowl, &SimilarityConfig::default());
    let hopping = BasinHopping::new(BasinHoppingConfig {
        n_steps: 20,
        adjust_interval: 5,
        adjust_factor: 0.5,
        target_acceptance: 0.5,
        ..BasinHoppingConfig::default()
    })
    .unwrap();
    let mut rng = RngHandle::from_seed(3);
    let summary = hopping
        .run(&mut network, &bowl, &Lbfgs::default(), None, &mut rng)
        .unwrap();
    // every trial lands on the single minimum and ties are accepted
    assert_eq!(summary.accepted, 20);
    assert!((summary.final_displacements[0] - 5.0 * 16.0).abs() < 1e-9);
}

#[test]
fn invalid_configs_are_rejected() {
    let bad = BasinHoppingConfig {
        temperature: -1.0,
        ..BasinHoppingConfig::default()
    };
    assert!(BasinHopping::new(bad).is_err());
    let bad = BasinHoppingConfig {
        adjust_interval: 3,
        adjust_factor: 1.5,
        ..BasinHoppingConfig::default()
    };
    assert!(BasinHopping::new(bad).is_err());
}
