//! netlab CLI - grow experiment networks from the terminal
//!
//! Builds a network with one of the topology generators, adds agents and
//! sources, and reports the result or checks its structural invariants.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use netlab::TopologyConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::GrowthPlan;

/// netlab - dynamic experiment networks
#[derive(Parser)]
#[command(name = "netlab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Grow experiment networks and inspect their structure")]
#[command(long_about = r#"
Grow an experiment network with one of the built-in topologies.

Examples:
  netlab grow -t chain -a 4 -s 1
  netlab grow -t scale-free --m0 4 --m 2 -a 50 --seed 7 --json
  netlab check --plan plan.toml --strict
"#)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a network and print its summary
    Grow {
        #[command(flatten)]
        args: PlanArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grow a network and check its invariants
    Check {
        #[command(flatten)]
        args: PlanArgs,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TopologyArg {
    Base,
    Chain,
    FullyConnected,
    ScaleFree,
    DiscreteGenerational,
}

#[derive(Args)]
struct PlanArgs {
    /// Read the growth plan from a TOML file (other plan flags are ignored)
    #[arg(short, long, env = "NETLAB_PLAN")]
    plan: Option<PathBuf>,

    /// Topology generator
    #[arg(short, long, value_enum, default_value = "base")]
    topology: TopologyArg,

    /// Number of agents to add
    #[arg(short, long, default_value = "10")]
    agents: usize,

    /// Number of sources to add
    #[arg(short, long, default_value = "0")]
    sources: usize,

    /// Number of agents to fail after growth
    #[arg(long, default_value = "0")]
    fail: usize,

    /// Maximum number of nodes
    #[arg(long)]
    max_size: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Size of the fully connected seed (scale-free)
    #[arg(long, default_value = "4")]
    m0: usize,

    /// Links per new agent (scale-free)
    #[arg(long, default_value = "4")]
    m: usize,

    /// Number of generations (discrete-generational)
    #[arg(long, default_value = "4")]
    generations: usize,

    /// Agents per generation (discrete-generational)
    #[arg(long, default_value = "4")]
    generation_size: usize,

    /// Do not feed generation 0 from sources (discrete-generational)
    #[arg(long)]
    no_initial_source: bool,
}

impl PlanArgs {
    fn into_plan(self) -> Result<GrowthPlan> {
        if let Some(path) = &self.plan {
            return GrowthPlan::load(path);
        }

        let topology = match self.topology {
            TopologyArg::Base => TopologyConfig::Base,
            TopologyArg::Chain => TopologyConfig::Chain,
            TopologyArg::FullyConnected => TopologyConfig::FullyConnected,
            TopologyArg::ScaleFree => TopologyConfig::ScaleFree {
                m0: self.m0,
                m: self.m,
            },
            TopologyArg::DiscreteGenerational => TopologyConfig::DiscreteGenerational {
                generations: self.generations,
                generation_size: self.generation_size,
                initial_source: !self.no_initial_source,
            },
        };

        let mut plan = GrowthPlan::new(topology);
        plan.network.max_size = self.max_size;
        plan.network.seed = self.seed;
        plan.agents = self.agents;
        plan.sources = self.sources;
        plan.fail = self.fail;
        Ok(plan)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("netlab={},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Grow { args, json } => {
            commands::run_grow(&args.into_plan()?, json)?;
        }
        Commands::Check { args, strict } => {
            if !commands::run_check(&args.into_plan()?, strict)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
