//! The execution engine: tick scheduling, attempt orchestration, and
//! slippage recalibration.

mod attempt;
mod recalibrate;
mod scheduler;

pub use attempt::{execute_attempt, AttemptParams};
pub use recalibrate::Recalibrator;
pub use scheduler::{Dispatch, Scheduler};

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::TokenSymbol;
use crate::port::{AuditSink, Ledger, NotifierRegistry, VenueRegistry};
use crate::state::{AllowList, PriceBook, SlippageModel};

/// Tunables the engine reads at dispatch and attempt time.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// The token cycled through every two-hop route.
    pub anchor: TokenSymbol,
    /// Notional amount of anchor committed per attempt.
    pub starting_bet: Decimal,
    /// Attempts at or below this estimated profit are skipped (or promoted
    /// to simulate-only in calibration mode).
    pub profit_threshold: Decimal,
    /// Promote unprofitable attempts to simulate-only runs to keep the
    /// slippage model fresh.
    pub calibration_mode: bool,
    pub tick_interval: Duration,
    /// Confirmation polls before an attempt is declared lost.
    pub max_confirmation_polls: u32,
    pub confirmation_poll_interval: Duration,
}

/// Shared services bundle handed to the scheduler and every attempt task.
pub struct EngineContext {
    pub prices: Arc<PriceBook>,
    pub slippage: Arc<SlippageModel>,
    pub allow_list: Arc<AllowList>,
    pub venues: VenueRegistry,
    pub ledger: Arc<dyn Ledger>,
    pub recalibrator: Arc<Recalibrator>,
    pub notifiers: Arc<NotifierRegistry>,
    pub audit: Arc<dyn AuditSink>,
    pub settings: EngineSettings,
}
