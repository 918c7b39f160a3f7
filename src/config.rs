//! Configuration loading and validation.
//!
//! Configuration comes from a TOML file with environment-variable overrides
//! for delivery endpoints, plus CLI overrides for the anchor token, bet size,
//! and calibration mode.

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::TokenSymbol;
use crate::engine::EngineSettings;
use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Anchor token cycled through every route.
    #[serde(default = "default_anchor")]
    pub anchor: String,
    /// Notional amount of anchor committed per attempt.
    #[serde(default = "default_starting_bet")]
    pub starting_bet: Decimal,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub paper: PaperConfig,
}

fn default_anchor() -> String {
    "USDC".to_string()
}

fn default_starting_bet() -> Decimal {
    Decimal::from(5)
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Routes estimating at or below this fraction are not executed.
    #[serde(default)]
    pub profit_threshold: Decimal,
    /// Initial slippage assumption; factors default to `1 - starting_slippage`.
    #[serde(default)]
    pub starting_slippage: Decimal,
    /// Promote unprofitable routes to simulate-only calibration runs.
    #[serde(default)]
    pub calibration_mode: bool,
    #[serde(default = "default_max_confirmation_polls")]
    pub max_confirmation_polls: u32,
    #[serde(default = "default_confirmation_poll_interval_ms")]
    pub confirmation_poll_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    60
}

fn default_max_confirmation_polls() -> u32 {
    1000
}

fn default_confirmation_poll_interval_ms() -> u64 {
    200
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            profit_threshold: Decimal::ZERO,
            starting_slippage: Decimal::ZERO,
            calibration_mode: false,
            max_confirmation_polls: default_max_confirmation_polls(),
            confirmation_poll_interval_ms: default_confirmation_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Notification delivery. The webhook URL is taken from the
/// `SOLARB_WEBHOOK_URL` env var at load time, never from the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    #[serde(skip)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// JSONL trade-history path; unset disables the audit file.
    #[serde(default = "default_audit_path")]
    pub path: Option<String>,
}

fn default_audit_path() -> Option<String> {
    Some("trades.jsonl".to_string())
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: default_audit_path(),
        }
    }
}

/// Paper-trading backends used when no live integration is wired in.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    /// Fraction of the quoted rate paper fills realize.
    #[serde(default = "default_fill_ratio")]
    pub fill_ratio: Decimal,
    /// Starting anchor balance of the paper wallet.
    #[serde(default = "default_anchor_balance")]
    pub anchor_balance: Decimal,
    /// Token allow-list served by the paper feed.
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub pools: Vec<PaperPoolConfig>,
}

fn default_fill_ratio() -> Decimal {
    Decimal::new(998, 3) // 0.998
}

fn default_anchor_balance() -> Decimal {
    Decimal::from(1000)
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            fill_ratio: default_fill_ratio(),
            anchor_balance: default_anchor_balance(),
            tokens: Vec::new(),
            pools: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaperPoolConfig {
    pub id: String,
    pub address: String,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.notify.webhook_url = std::env::var("SOLARB_WEBHOOK_URL").ok();

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.anchor.is_empty() {
            return Err(ConfigError::MissingField { field: "anchor" }.into());
        }
        if self.starting_bet <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "starting_bet",
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.paper.fill_ratio <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "paper.fill_ratio",
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.engine.max_confirmation_polls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_confirmation_polls",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            anchor: TokenSymbol::new(self.anchor.clone()),
            starting_bet: self.starting_bet,
            profit_threshold: self.engine.profit_threshold,
            calibration_mode: self.engine.calibration_mode,
            tick_interval: Duration::from_millis(self.engine.tick_interval_ms),
            max_confirmation_polls: self.engine.max_confirmation_polls,
            confirmation_poll_interval: Duration::from_millis(
                self.engine.confirmation_poll_interval_ms,
            ),
        }
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anchor: default_anchor(),
            starting_bet: default_starting_bet(),
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
            notify: NotifyConfig::default(),
            audit: AuditConfig::default(),
            paper: PaperConfig::default(),
        }
    }
}
