use tempfile::tempdir;
use topo_core::errors::TopoError;
use topo_land::explore::{MANIFEST_FILE, PLAN_FILE, REPORT_FILE};
use topo_land::serde::read_json;
use topo_land::{
    load_plan, run_plan, run_plan_from_path, ExploreReport, PairStrategy, Plan, RunManifest,
};
use topo_network::{canonical_hash, KineticTransitionNetwork, SimilarityComparer};
use topo_search::BasinHoppingConfig;

fn small_plan() -> Plan {
    let mut plan = Plan {
        seed: 5,
        cycles: 2,
        basin_hopping: BasinHoppingConfig {
            n_steps: 15,
            ..BasinHoppingConfig::default()
        },
        ..Plan::default()
    };
    plan.sampling.strategy = PairStrategy::ClosestEnumeration { k: 1 };
    plan.sampling.multiprocessing = true;
    plan.sampling.n_processes = 2;
    plan.output.suffix = ".camel".to_string();
    plan
}

#[test]
fn exploration_writes_network_report_and_manifest() {
    let dir = tempdir().unwrap();
    let plan = small_plan();
    let report = run_plan(&plan, dir.path()).unwrap();

    assert_eq!(report.cycles.len(), 2);
    assert_ne!(report.cycles[0].seed, report.cycles[1].seed);
    assert_eq!(report.plan_hash, plan.plan_hash().unwrap());
    assert!(dir.path().join("min.data.camel").exists());
    assert!(dir.path().join("ts.pairs.camel").exists());

    let stored: ExploreReport = read_json(&dir.path().join(REPORT_FILE)).unwrap();
    assert_eq!(stored, report);

    let manifest = RunManifest::load(&dir.path().join(MANIFEST_FILE)).unwrap();
    assert_eq!(manifest.plan, plan);
    assert_eq!(manifest.provenance.seed, 5);
    assert_eq!(manifest.provenance.network_hash, report.network_hash);
    assert_eq!(manifest.provenance.potential, "camelback");
    assert!(!manifest.provenance.created_at.is_empty());
    assert_eq!(manifest.network_files.len(), 6);
    assert!(manifest.network_files.iter().all(|name| name.ends_with(".camel")));
    assert_eq!(manifest.summary, report.summary);
    assert_eq!(load_plan(dir.path().join(PLAN_FILE)).unwrap(), plan);

    let potential = plan.potential.build().unwrap();
    let comparer = SimilarityComparer::new(&plan.similarity, potential.bounds()).unwrap();
    let mut restored = KineticTransitionNetwork::new(comparer);
    restored.read_network(dir.path(), ".camel").unwrap();
    assert_eq!(canonical_hash(&restored), report.network_hash);
    assert_eq!(restored.summary(), report.summary);
}

#[test]
fn the_same_plan_explores_the_same_network() {
    let plan = small_plan();
    let first = run_plan(&plan, tempdir().unwrap().path()).unwrap();
    let mut serial = plan.clone();
    serial.sampling.multiprocessing = false;
    let second = run_plan(&serial, tempdir().unwrap().path()).unwrap();
    assert_eq!(first.network_hash, second.network_hash);
    assert_eq!(first.cycles, second.cycles);
}

#[test]
fn plan_files_drive_the_run() {
    let dir = tempdir().unwrap();
    let plan_path = dir.path().join("plan.yaml");
    let mut plan = small_plan();
    plan.cycles = 1;
    std::fs::write(&plan_path, plan.to_yaml_string().unwrap()).unwrap();

    let out = dir.path().join("run");
    let report = run_plan_from_path(&plan_path, &out).unwrap();
    assert_eq!(report.cycles.len(), 1);
    assert!(out.join(MANIFEST_FILE).exists());
}

#[test]
fn invalid_plans_fail_before_writing_a_network() {
    let dir = tempdir().unwrap();
    let mut plan = small_plan();
    plan.basin_hopping.temperature = -1.0;
    assert!(run_plan(&plan, dir.path()).is_err());
    assert!(!dir.path().join("min.data.camel").exists());
}

#[test]
fn unwritable_plan_copy_is_an_error() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join(PLAN_FILE)).unwrap();
    let mut plan = small_plan();
    plan.cycles = 1;
    let err = run_plan(&plan, dir.path()).unwrap_err();
    assert!(matches!(err, TopoError::Serde(ref info) if info.code == "plan-write"));
    assert!(!dir.path().join(MANIFEST_FILE).exists());
}
