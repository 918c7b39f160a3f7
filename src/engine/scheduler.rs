//! The fixed-cadence tick loop that turns price state into dispatched
//! attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use rust_decimal::Decimal;
use tabled::{Table, Tabled};
use tracing::{debug, info, warn};

use crate::domain::Route;
use crate::routes::{best_route_per_token, group_by_intermediate};
use crate::state::SlippageSnapshot;

use super::attempt::{execute_attempt, AttemptParams};
use super::EngineContext;

/// In calibration mode, ranks below this are always promoted to
/// simulate-only runs; the rest are promoted with [`PROMOTION_PROBABILITY`].
const ALWAYS_PROMOTED_RANKS: usize = 2;
const PROMOTION_PROBABILITY: f64 = 0.3;

/// What the scheduler decided to do with one ranked route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Execute for real.
    Execute,
    /// Run in simulate-only mode to refresh the slippage model.
    Simulate,
    /// Do nothing this tick.
    Skip,
}

/// Fixed-cadence cooperative loop over the whole pipeline: regroup pools,
/// estimate profits, dispatch the best route per intermediate token, and
/// wait for the batch to settle.
pub struct Scheduler {
    ctx: Arc<EngineContext>,
    /// Advisory readiness gate: cleared at dispatch, set once the batch has
    /// settled. The tick timer fires on wall-clock cadence regardless, so
    /// this is a best-effort signal, not a mutual-exclusion barrier.
    ready: AtomicBool,
}

impl Scheduler {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self {
            ctx,
            ready: AtomicBool::new(true),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Run ticks forever at the configured cadence.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.ctx.settings.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// One tick: refresh groupings, rank routes, dispatch, join.
    pub async fn tick(&self) {
        let ctx = &self.ctx;

        if !self.is_ready() {
            debug!("Previous batch still settling; tick proceeds on cadence");
        }

        let pools = ctx.prices.snapshot();
        for pool in &pools {
            ctx.slippage.ensure(pool.id());
        }

        let valid_tokens = ctx.allow_list.snapshot();
        let groups = group_by_intermediate(&ctx.settings.anchor, &valid_tokens, &pools);
        let slippage = ctx.slippage.snapshot();

        let mut routes = best_route_per_token(&groups, &slippage);
        routes.sort_by(|a, b| b.estimated_profit().cmp(&a.estimated_profit()));

        info!(
            pools = pools.len(),
            intermediates = groups.len(),
            routes = routes.len(),
            "Tick"
        );
        render_tables(&slippage, &routes, &ctx.settings.anchor.to_string());

        self.ready.store(false, Ordering::SeqCst);

        let mut handles = Vec::new();
        for (rank, route) in routes.into_iter().enumerate() {
            let simulate_only = match self.plan(rank, route.estimated_profit()) {
                Dispatch::Execute => false,
                Dispatch::Simulate => true,
                Dispatch::Skip => continue,
            };

            let bet = ctx.settings.starting_bet;
            let params = AttemptParams {
                expected_end: bet + bet * route.estimated_profit(),
                route,
                from_amount: bet,
                simulate_only,
            };

            let ctx = self.ctx.clone();
            handles.push(tokio::spawn(async move {
                execute_attempt(&ctx, params).await;
            }));
        }

        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "Attempt task panicked");
            }
        }

        self.ready.store(true, Ordering::SeqCst);
    }

    /// Dispatch policy for one ranked route.
    ///
    /// Profitable routes execute. At or below the threshold, calibration
    /// mode promotes the first [`ALWAYS_PROMOTED_RANKS`] ranks always and
    /// the rest with fixed probability, purely to keep the slippage model
    /// fresh; outside calibration mode they are skipped.
    pub fn plan(&self, rank: usize, estimated_profit: Decimal) -> Dispatch {
        if estimated_profit > self.ctx.settings.profit_threshold {
            return Dispatch::Execute;
        }
        if !self.ctx.settings.calibration_mode {
            return Dispatch::Skip;
        }
        if rank < ALWAYS_PROMOTED_RANKS || rand::random::<f64>() < PROMOTION_PROBABILITY {
            return Dispatch::Simulate;
        }
        Dispatch::Skip
    }
}

#[derive(Tabled)]
struct SlippageRow {
    #[tabled(rename = "Pool")]
    pool: String,
    #[tabled(rename = "Leg 0 multiplier")]
    leg0: String,
    #[tabled(rename = "Leg 1 multiplier")]
    leg1: String,
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Estimated profit")]
    profit: String,
    #[tabled(rename = "First pool")]
    first: String,
    #[tabled(rename = "Second pool")]
    second: String,
}

/// Per-tick console tables: current slippage factors and the ranked dispatch
/// set.
fn render_tables(slippage: &SlippageSnapshot, routes: &[Route], anchor: &str) {
    if !slippage.is_empty() {
        let mut rows: Vec<SlippageRow> = slippage
            .iter()
            .map(|(pool, factors)| SlippageRow {
                pool: pool.to_string(),
                leg0: format!("{:.4}", factors[0]),
                leg1: format!("{:.4}", factors[1]),
            })
            .collect();
        rows.sort_by(|a, b| a.pool.cmp(&b.pool));
        println!("{}", Table::new(rows));
    }

    if !routes.is_empty() {
        let rows: Vec<RouteRow> = routes
            .iter()
            .map(|route| RouteRow {
                profit: format!("{} per 1 {anchor}", route.estimated_profit()),
                first: route.first().id().to_string(),
                second: route.second().id().to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }
}
