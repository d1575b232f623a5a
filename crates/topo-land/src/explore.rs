use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};
use topo_core::Lbfgs;
use topo_network::{
    canonical_hash, KineticTransitionNetwork, NetworkSummary, SimilarityComparer, NETWORK_FILES,
};
use topo_search::determinism::{basin_hopping_rng, basin_hopping_seed};
use topo_search::{
    BasinHopping, BasinHoppingSummary, HybridEigenvectorFollowing, NudgedElasticBand,
};

use crate::manifest::RunManifest;
use crate::plan::{load_plan, Plan};
use crate::report::LandscapeReport;
use crate::sampling::NetworkSampling;
use crate::serde::write_canonical_json;

/// File holding the [`ExploreReport`] inside the run directory.
pub const REPORT_FILE: &str = "explore_report.json";
/// File holding the [`RunManifest`] inside the run directory.
pub const MANIFEST_FILE: &str = "manifest.json";
/// File holding the plan, as YAML, inside the run directory.
pub const PLAN_FILE: &str = "plan.yaml";

/// One basin-hopping run followed by one landscape pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Seed of the basin-hopping stream.
    pub seed: u64,
    /// Global optimisation outcome.
    pub basin_hopping: BasinHoppingSummary,
    /// Landscape generation outcome.
    pub landscape: LandscapeReport,
}

/// Everything an exploration run did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreReport {
    /// Hash of the plan.
    pub plan_hash: String,
    /// Cycles in execution order.
    pub cycles: Vec<CycleReport>,
    /// Network statistics at the end.
    pub summary: NetworkSummary,
    /// Canonical network hash at the end.
    pub network_hash: String,
}

/// Runs every cycle of `plan`, then writes the network, the report and the
/// manifest into `out`. The plan itself is written once it has validated.
///
/// Cycle `i` restarts basin hopping from the lowest minimum found so far with
/// a stream derived from the master seed and `i`, so a plan always explores
/// the same network.
pub fn run_plan(plan: &Plan, out: &Path) -> Result<ExploreReport, TopoError> {
    fs::create_dir_all(out).map_err(|err| io_error("run-dir", out, err))?;
    let potential = plan.potential.build()?;
    let minimizer = Lbfgs::new(plan.minimizer.clone());
    let comparer = SimilarityComparer::new(&plan.similarity, potential.bounds())?;
    let mut network = KineticTransitionNetwork::new(comparer);
    let sampling = NetworkSampling::new(
        potential.as_ref(),
        &minimizer,
        BasinHopping::new(plan.basin_hopping.clone())?,
        NudgedElasticBand::new(plan.neb.clone())?,
        HybridEigenvectorFollowing::new(plan.hef.clone())?,
        plan.sampling.clone(),
    );
    let plan_path = out.join(PLAN_FILE);
    fs::write(&plan_path, plan.to_yaml_string()?)
        .map_err(|err| io_error("plan-write", &plan_path, err))?;

    let mut cycles = Vec::with_capacity(plan.cycles);
    for cycle in 0..plan.cycles {
        let seed = basin_hopping_seed(plan.seed, cycle);
        let mut rng = basin_hopping_rng(plan.seed, cycle);
        let start = network.global_minimum().map(|m| m.point.clone());
        let basin_hopping =
            sampling.global_optimisation(&mut network, start.as_deref(), &mut rng)?;
        let landscape = sampling.generate_landscape(&mut network, &plan.sampling.strategy)?;
        log::info!(
            "cycle {cycle}: {} minima, {} transition states",
            network.n_minima(),
            network.n_transition_states()
        );
        cycles.push(CycleReport {
            seed,
            basin_hopping,
            landscape,
        });
    }

    network.dump_network(out, &plan.output.suffix)?;
    let summary = network.summary();
    let network_hash = canonical_hash(&network);
    let report = ExploreReport {
        plan_hash: plan.plan_hash()?,
        cycles,
        summary: summary.clone(),
        network_hash: network_hash.clone(),
    };
    write_canonical_json(&out.join(REPORT_FILE), &report)?;

    let network_files = NETWORK_FILES
        .iter()
        .map(|name| format!("{name}{}", plan.output.suffix))
        .collect();
    let manifest = RunManifest::new(plan, potential.name(), network_hash, summary, network_files)?;
    manifest.write(&out.join(MANIFEST_FILE))?;
    Ok(report)
}

/// Loads a plan from disk and executes it.
pub fn run_plan_from_path(plan_path: &Path, out: &Path) -> Result<ExploreReport, TopoError> {
    let plan = load_plan(plan_path)?;
    run_plan(&plan, out)
}

fn io_error(code: &str, path: &Path, err: impl ToString) -> TopoError {
    TopoError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

