//! GOAP scenario runner.
//!
//! - `goap run` - simulate a scenario and report what every agent did
//! - `goap plan` - show the plan an agent would pick for each of its goals
//! - `goap check` - validate a scenario file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use goap_agent::AgentStep;
use goap_sim::{ScenarioConfig, Simulation};

#[derive(Parser)]
#[command(name = "goap")]
#[command(about = "Run goal-oriented action planning scenarios", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario
    Run {
        /// Scenario file (YAML)
        scenario: PathBuf,

        /// Number of ticks to run (defaults to the scenario's max_ticks)
        #[arg(long)]
        ticks: Option<u64>,

        /// Print every agent's decision trace as JSON lines
        #[arg(long)]
        trace: bool,
    },

    /// Plan for every goal of one agent against the initial world
    Plan {
        /// Scenario file (YAML)
        scenario: PathBuf,

        /// Agent name
        #[arg(long)]
        agent: String,
    },

    /// Validate a scenario without running it
    Check {
        /// Scenario file (YAML)
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            ticks,
            trace,
        } => run_scenario(&scenario, ticks, trace),
        Commands::Plan { scenario, agent } => show_plans(&scenario, &agent),
        Commands::Check { scenario } => check_scenario(&scenario),
    }
}

fn load(path: &Path) -> Result<(ScenarioConfig, Simulation)> {
    let config = ScenarioConfig::load(path)
        .with_context(|| format!("Failed to load scenario from {}", path.display()))?;
    let sim = Simulation::from_config(&config)
        .with_context(|| format!("Failed to build simulation from {}", path.display()))?;
    Ok((config, sim))
}

fn run_scenario(path: &Path, ticks: Option<u64>, trace: bool) -> Result<()> {
    let (_, mut sim) = load(path)?;
    tracing::info!(scenario = %path.display(), "Running scenario");

    let reports = sim.run(ticks);
    for report in &reports {
        for (id, step) in &report.steps {
            if matches!(
                step,
                AgentStep::Executing | AgentStep::CompletionPending | AgentStep::NoPlan | AgentStep::Idle
            ) {
                continue;
            }
            let Some(sim_agent) = sim.agents().iter().find(|a| a.agent.id() == *id) else {
                continue;
            };
            println!("[{:>5}] {:<12} {:?}", report.tick, sim_agent.agent.name(), step);
        }
    }

    println!();
    println!("After {} ticks:", reports.len());
    for sim_agent in sim.agents() {
        let agent = &sim_agent.agent;
        let pos = sim_agent.body.position();
        println!(
            "  {} goal={} action={} at ({:.2}, {:.2})",
            agent.name(),
            agent.current_goal_name().unwrap_or("-"),
            agent.current_action().map(|a| a.name()).unwrap_or("-"),
            pos.x,
            pos.y
        );
    }
    println!("  world: {:?}", sim.world().facts());

    if trace {
        for sim_agent in sim.agents() {
            let name = sim_agent.agent.name();
            let Some(log) = sim.trace(name) else {
                continue;
            };
            for event in &log.events {
                let line = serde_json::json!({ "agent": name, "event": event });
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn show_plans(path: &Path, agent_name: &str) -> Result<()> {
    let (_, sim) = load(path)?;
    let sim_agent = sim
        .agent(agent_name)
        .with_context(|| format!("No agent named `{agent_name}` in {}", path.display()))?;
    let agent = &sim_agent.agent;

    println!("Plans for {} against the initial world:", agent.name());
    for goal in agent.goals() {
        let kind = if goal.persistent { "persistent" } else { "once" };
        match agent.plan_goal(&goal.name, sim.world())? {
            Some(plan) => println!(
                "  {} (importance {}, {}): {} [cost {:.2}]",
                goal.name,
                goal.importance,
                kind,
                plan.describe(agent.actions()),
                plan.cost
            ),
            None => println!(
                "  {} (importance {}, {}): no plan",
                goal.name, goal.importance, kind
            ),
        }
    }
    Ok(())
}

fn check_scenario(path: &Path) -> Result<()> {
    let (config, sim) = load(path)?;
    let action_count: usize = config.agent_types.iter().map(|t| t.actions.len()).sum();

    println!(
        "{}: ok",
        config.name.as_deref().unwrap_or(&path.display().to_string())
    );
    println!("  entities:    {}", sim.entities().len());
    println!("  agent types: {} ({} actions)", config.agent_types.len(), action_count);
    println!("  goal sets:   {}", config.goal_sets.len());
    println!("  agents:      {}", sim.agents().len());
    println!("  events:      {}", config.events.len());
    println!(
        "  sim:         dt={}s seed={} max_ticks={}",
        config.sim.dt_seconds, config.sim.seed, config.sim.max_ticks
    );
    Ok(())
}
