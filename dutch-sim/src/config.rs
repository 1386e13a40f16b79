//! Simulator configuration.

use anyhow::Context;

use dutch_core::SaleParameters;
use dutch_state::AuctionConfig;

use crate::cli::{Cli, SaleArgs};

/// Complete simulator configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Parameters of the deployed sale.
    pub parameters: SaleParameters,

    /// Engine configuration.
    pub auction: AuctionConfig,

    /// Log level.
    pub log_level: String,
}

impl SimConfig {
    /// Create a simulator configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = Self::from_sale_args(&cli.sale)?;
        config.log_level = cli.log_level.clone();
        Ok(config)
    }

    /// Build and validate the sale portion.
    pub fn from_sale_args(args: &SaleArgs) -> anyhow::Result<Self> {
        let parameters = SaleParameters::new(
            args.starting_price,
            args.reserved_price,
            args.decay_per_second,
            args.total_supply,
        )
        .context("invalid sale parameters")?;

        let auction = AuctionConfig::default()
            .with_sale_duration(args.sale_duration)
            .with_reentrancy_guard(!args.no_guard);
        auction.validate().context("invalid engine configuration")?;

        Ok(Self {
            parameters,
            auction,
            log_level: "info".to_string(),
        })
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            parameters: SaleParameters {
                starting_price: 2000,
                reserved_price: 1000,
                decay_per_second: 1,
                total_supply: 5000,
            },
            auction: AuctionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}
