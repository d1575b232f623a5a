use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use topo_core::MinimumId;
use topo_land::{load_plan, run_plan, Plan, PotentialSpec};
use topo_network::{KineticTransitionNetwork, NetworkSummary, SimilarityComparer};

#[derive(Parser, Debug)]
#[command(name = "topo-sim", about = "Transition network landscape explorer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default plan as YAML.
    Plan(PlanArgs),
    /// Run basin hopping and landscape cycles from a plan.
    Explore(ExploreArgs),
    /// Print statistics and barriers of a dumped network.
    Summary(SummaryArgs),
}

#[derive(ClapArgs, Debug)]
struct PlanArgs {
    /// Destination file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Master seed recorded in the plan.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(ClapArgs, Debug)]
struct ExploreArgs {
    /// YAML plan describing the run.
    #[arg(long)]
    plan: PathBuf,
    /// Output directory for the network and run artefacts.
    #[arg(long)]
    out: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct SummaryArgs {
    /// Plan the network was explored with; supplies the surface and criteria.
    #[arg(long)]
    plan: PathBuf,
    /// Directory holding the dumped network.
    #[arg(long = "in")]
    input: PathBuf,
    /// File suffix of the network; defaults to the plan's.
    #[arg(long)]
    suffix: Option<String>,
    /// Also report the barrier from the global minimum to every minimum.
    #[arg(long)]
    barriers: bool,
}

#[derive(Debug, Serialize)]
struct Barrier {
    minimum: MinimumId,
    value: f64,
    barrier: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SummaryOutput {
    summary: NetworkSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    barriers: Vec<Barrier>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Plan(args) => write_plan(args),
        Command::Explore(args) => explore(args),
        Command::Summary(args) => summarise(args),
    }
}

fn write_plan(args: PlanArgs) -> Result<(), Box<dyn Error>> {
    let plan = Plan {
        seed: args.seed,
        potential: PotentialSpec::Schwefel { dimension: 2 },
        ..Plan::default()
    };
    let yaml = plan.to_yaml_string()?;
    match args.out {
        Some(path) => {
            fs::write(&path, yaml)?;
            log::info!("plan written to {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

fn explore(args: ExploreArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let report = run_plan(&plan, &args.out)?;
    println!("{}", serde_json::to_string_pretty(&report.summary)?);
    log::info!(
        "explored {} cycles, network hash {}",
        report.cycles.len(),
        report.network_hash
    );
    Ok(())
}

fn summarise(args: SummaryArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let potential = plan.potential.build()?;
    let comparer = SimilarityComparer::new(&plan.similarity, potential.bounds())?;
    let mut network = KineticTransitionNetwork::new(comparer);
    let suffix = args.suffix.unwrap_or(plan.output.suffix);
    network.read_network(&args.input, &suffix)?;

    let mut barriers = Vec::new();
    if args.barriers {
        if let Some(global) = network.global_minimum() {
            for minimum in network.minima() {
                barriers.push(Barrier {
                    minimum: minimum.id,
                    value: minimum.value,
                    barrier: network.minimax_barrier(global.id, minimum.id)?,
                });
            }
        }
    }
    let output = SummaryOutput {
        summary: network.summary(),
        barriers,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
