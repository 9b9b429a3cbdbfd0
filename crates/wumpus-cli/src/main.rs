//! Wumpus CLI - knowledge-based cave explorer.
//!
//! - `wumpus run` - play a scenario to the end and print the final snapshots
//! - `wumpus query <literal>` - play a few turns, then ask the knowledge base
//! - `wumpus init` - write a sample scenario

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use wumpus_logic::Literal;

mod episode;
mod scenario;

use episode::Episode;
use scenario::{Scenario, SAMPLE_SCENARIO, SCENARIO_PATH};

#[derive(Parser)]
#[command(name = "wumpus")]
#[command(about = "Knowledge-based wumpus world agent", version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Scenario file (defaults to .wumpus/scenario.yaml under the project root)
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the scenario until the game ends or the turn cap is hit
    Run {
        /// Override the scenario's turn cap
        #[arg(long)]
        max_turns: Option<u64>,

        /// Emit one JSON object per turn and a JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Play some turns, then prove a literal against the agent's knowledge
    Query {
        /// Literal such as `Pit(1,2)` or `~Wumpus(0,2)`
        literal: String,

        /// Turns to play before asking
        #[arg(long, default_value_t = 0)]
        turns: u64,
    },

    /// Write a sample scenario
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
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

    let project_root = match cli.project {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Some(Commands::Run { max_turns, json }) => {
            let scenario = load_scenario(&project_root, cli.scenario.as_deref())?;
            run_scenario(&scenario, max_turns, json)
        }
        Some(Commands::Query { literal, turns }) => {
            let scenario = load_scenario(&project_root, cli.scenario.as_deref())?;
            query_literal(&scenario, &literal, turns)
        }
        Some(Commands::Init) => init_project(&project_root),
        None => {
            println!("Wumpus - knowledge-based cave explorer");
            println!();
            println!("Usage: wumpus <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run     Play a scenario to the end");
            println!("  query   Prove a literal after some turns");
            println!("  init    Write a sample scenario");
            println!();
            println!("Run 'wumpus --help' for more information.");
            Ok(())
        }
    }
}

fn load_scenario(project_root: &Path, explicit: Option<&Path>) -> Result<Scenario> {
    match explicit {
        Some(path) => Scenario::load(path),
        None => Scenario::load_from_project(project_root),
    }
}

fn run_scenario(scenario: &Scenario, max_turns: Option<u64>, json: bool) -> Result<()> {
    let mut episode = Episode::new(scenario)?;
    let cap = max_turns.unwrap_or(scenario.max_turns);

    let mut line_error = None;
    episode.run(cap, |report| {
        if json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    line_error.get_or_insert(e);
                }
            }
        } else {
            let action = report
                .decision
                .action
                .map_or_else(|| "wait".to_string(), |a| a.to_string());
            println!(
                "turn {:>3} at {}: {:?} -> {} ({})",
                report.turn, report.position, report.decision.kind, action, report.decision.reason
            );
        }
    });
    if let Some(e) = line_error {
        return Err(e).context("Failed to serialize turn report");
    }

    let summary = episode.summary();
    let output = json!({
        "summary": summary,
        "agent": episode.agent().snapshot(),
        "knowledge": episode.agent().knowledge(),
    });

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!();
        println!(
            "{} after {} turns, score {}",
            summary.message, summary.turns, summary.score
        );
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn query_literal(scenario: &Scenario, text: &str, turns: u64) -> Result<()> {
    let literal: Literal = text
        .parse()
        .with_context(|| format!("Invalid literal `{text}`"))?;

    let mut episode = Episode::new(scenario)?;
    episode.run(turns, |_| {});

    let kb = episode.agent().knowledge_base();
    let outcome = kb.prove(&literal);
    tracing::debug!(%literal, ?outcome, "query answered");

    let output = json!({
        "literal": literal.to_string(),
        "turns": episode.summary().turns,
        "known": kb.has_fact(&literal),
        "confidence": kb.confidence(&literal),
        "entailed": outcome.is_proved(),
        "outcome": outcome,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_project(project_root: &Path) -> Result<()> {
    let scenario_path = project_root.join(SCENARIO_PATH);
    if let Some(dir) = scenario_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    if scenario_path.exists() {
        println!("Scenario already exists at {}", scenario_path.display());
        return Ok(());
    }

    std::fs::write(&scenario_path, SAMPLE_SCENARIO)
        .with_context(|| format!("Failed to write {}", scenario_path.display()))?;

    println!("Initialized wumpus project at {}", project_root.display());
    println!("Created: {}", scenario_path.display());
    Ok(())
}
