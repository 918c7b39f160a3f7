//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;

use crate::config::Config;

/// Two-hop DEX arbitrage engine with slippage auto-calibration.
#[derive(Debug, Parser)]
#[command(name = "solarb", version, about)]
pub struct Cli {
    /// Anchor token to cycle through (defaults to the configured stablecoin).
    pub anchor: Option<String>,

    /// Starting notional bet size in anchor units.
    pub bet: Option<Decimal>,

    /// Promote unprofitable routes to simulate-only runs that keep the
    /// slippage model calibrated without spending capital.
    #[arg(long)]
    pub calibrate: bool,

    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
}

impl Cli {
    /// Fold CLI overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(anchor) = &self.anchor {
            config.anchor = anchor.clone();
        }
        if let Some(bet) = self.bet {
            config.starting_bet = bet;
        }
        if self.calibrate {
            config.engine.calibration_mode = true;
        }
    }
}
