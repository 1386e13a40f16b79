//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use dutch_core::{Amount, Units};
use dutch_state::DEFAULT_SALE_DURATION;

/// Dutch auction simulator.
#[derive(Parser, Debug, Clone)]
#[command(name = "dutch-sim")]
#[command(about = "Deploy a descending-price sale and replay scenarios against it")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub sale: SaleArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Sale parameters, defaulting to the reference deployment.
#[derive(Args, Debug, Clone)]
pub struct SaleArgs {
    /// Unit price when the sale opens.
    #[arg(long, global = true, default_value_t = 2000)]
    pub starting_price: Amount,

    /// Price floor.
    #[arg(long, global = true, default_value_t = 1000)]
    pub reserved_price: Amount,

    /// Price decrease per second.
    #[arg(long, global = true, default_value_t = 1)]
    pub decay_per_second: Amount,

    /// Units for sale.
    #[arg(long, global = true, default_value_t = 5000)]
    pub total_supply: Units,

    /// Seconds from start to the bidding deadline.
    #[arg(long, global = true, default_value_t = DEFAULT_SALE_DURATION)]
    pub sale_duration: u64,

    /// Disable the reentrancy guard.
    #[arg(long, global = true)]
    pub no_guard: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deploy, fund and replay a scenario, then print a settlement report.
    Run {
        /// JSON scenario file (built-in reference flow if omitted).
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Write the final engine snapshot here.
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },

    /// Print the price schedule up to the deadline.
    Schedule {
        /// Seconds between rows.
        #[arg(long, default_value_t = 60)]
        step: u64,
    },

    /// Decode and print a snapshot file.
    Inspect {
        /// Snapshot written by `run --snapshot-out`.
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cli = Cli::parse_from(["dutch-sim", "run"]);
        assert_eq!(cli.sale.starting_price, 2000);
        assert_eq!(cli.sale.reserved_price, 1000);
        assert_eq!(cli.sale.decay_per_second, 1);
        assert_eq!(cli.sale.total_supply, 5000);
        assert_eq!(cli.sale.sale_duration, 1200);
        assert!(!cli.sale.no_guard);
        assert_eq!(cli.log_level, "info");
        assert!(matches!(
            cli.command,
            Commands::Run { scenario: None, snapshot_out: None }
        ));
    }

    #[test]
    fn test_sale_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "dutch-sim",
            "schedule",
            "--step",
            "120",
            "--starting-price",
            "3000",
            "--no-guard",
        ]);
        assert_eq!(cli.sale.starting_price, 3000);
        assert!(cli.sale.no_guard);
        assert!(matches!(cli.command, Commands::Schedule { step: 120 }));
    }

    #[test]
    fn test_run_with_files() {
        let cli = Cli::parse_from([
            "dutch-sim",
            "run",
            "--scenario",
            "flow.json",
            "--snapshot-out",
            "out.bin",
        ]);
        match cli.command {
            Commands::Run { scenario, snapshot_out } => {
                assert_eq!(scenario, Some(PathBuf::from("flow.json")));
                assert_eq!(snapshot_out, Some(PathBuf::from("out.bin")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_inspect_requires_file() {
        assert!(Cli::try_parse_from(["dutch-sim", "inspect"]).is_err());
    }
}
