//! Dutch auction simulator binary.

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use dutch_core::crypto::sha256;
use dutch_core::serialization::deserialize;
use dutch_state::{AuctionState, Clock, SystemClock};

use dutch_sim::cli::{Cli, Commands};
use dutch_sim::output;
use dutch_sim::{Scenario, SimConfig, Simulation};

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    let config = SimConfig::from_cli(&cli)?;

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Run { scenario, snapshot_out } => {
            run(&config, scenario.as_deref(), snapshot_out.as_deref())
        }
        Commands::Schedule { step } => {
            output::print_schedule(&config.parameters, config.auction.sale_duration, *step);
            Ok(())
        }
        Commands::Inspect { file } => inspect(file),
    }
}

fn run(config: &SimConfig, scenario: Option<&Path>, snapshot_out: Option<&Path>) -> anyhow::Result<()> {
    let scenario = match scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::reference(),
    };

    let title = if scenario.name.is_empty() { "SCENARIO" } else { scenario.name.as_str() };
    output::banner(&title.to_uppercase());

    let mut sim = Simulation::deploy(config, &scenario, SystemClock.now())?;
    for step in &scenario.steps {
        let record = sim.apply(step)?;
        output::print_record(&record);
    }

    output::print_events(&sim.auction().events());
    let report = sim.report();
    output::print_report(&report);

    if let Some(path) = snapshot_out {
        sim.write_snapshot(path)?;
    }

    if !report.conserved {
        anyhow::bail!("value conservation check failed");
    }
    Ok(())
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let state: AuctionState = deserialize(&bytes)
        .with_context(|| format!("failed to decode snapshot {}", path.display()))?;
    output::print_snapshot(&state, &sha256(&bytes));
    Ok(())
}
