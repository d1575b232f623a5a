use std::fs;

use tempfile::tempdir;
use topo_core::TopoError;
use topo_land::serde::{from_yaml_slice, to_canonical_json_bytes};
use topo_land::{load_plan, PairStrategy, Plan, PotentialSpec};

#[test]
fn default_plan_survives_yaml() {
    let plan = Plan::default();
    let yaml = plan.to_yaml_string().unwrap();
    let parsed: Plan = from_yaml_slice(yaml.as_bytes()).unwrap();
    assert_eq!(parsed, plan);
    assert_eq!(parsed.plan_hash().unwrap(), plan.plan_hash().unwrap());
}

#[test]
fn sparse_plan_takes_defaults() {
    let yaml = r#"
seed: 42
potential:
  kind: schwefel
  dimension: 2
sampling:
  strategy:
    kind: connect-unconnected
    k: 2
  multiprocessing: true
basin_hopping:
  n_steps: 10
output:
  suffix: ".run"
"#;
    let plan: Plan = from_yaml_slice(yaml.as_bytes()).unwrap();
    assert_eq!(plan.seed, 42);
    assert_eq!(plan.potential, PotentialSpec::Schwefel { dimension: 2 });
    assert_eq!(plan.sampling.strategy, PairStrategy::ConnectUnconnected { k: 2 });
    assert_eq!(plan.sampling.n_processes, 4);
    assert_eq!(plan.basin_hopping.n_steps, 10);
    assert_eq!(plan.basin_hopping.temperature, 1.0);
    assert_eq!(plan.cycles, 1);
    assert_eq!(plan.output.suffix, ".run");
    assert_eq!(plan.neb, Default::default());

    let potential = plan.potential.build().unwrap();
    assert_eq!(potential.dimension(), 2);
}

#[test]
fn plan_hash_tracks_content() {
    let plan = Plan::default();
    let mut other = plan.clone();
    other.seed += 1;
    assert_ne!(plan.plan_hash().unwrap(), other.plan_hash().unwrap());

    let canonical = to_canonical_json_bytes(&plan).unwrap();
    assert_eq!(canonical, to_canonical_json_bytes(&plan.clone()).unwrap());
}

#[test]
fn load_plan_reads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.yaml");
    let plan = Plan {
        seed: 7,
        potential: PotentialSpec::DoubleWell {
            dimension: 3,
            stiffness: 0.5,
        },
        ..Plan::default()
    };
    fs::write(&path, plan.to_yaml_string().unwrap()).unwrap();
    assert_eq!(load_plan(&path).unwrap(), plan);

    let missing = load_plan(dir.path().join("absent.yaml"));
    assert!(matches!(missing, Err(TopoError::Serde(info)) if info.code == "plan-read"));
}

#[test]
fn invalid_surfaces_fail_to_build() {
    let spec = PotentialSpec::Quadratic {
        bounds: vec![(0.0, 1.0)],
        centre: vec![0.5, 0.5],
        weights: vec![1.0],
    };
    assert!(spec.build().is_err());
    assert!(PotentialSpec::Schwefel { dimension: 0 }.build().is_err());
}
