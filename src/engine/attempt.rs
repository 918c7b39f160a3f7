//! One dispatched execution attempt: leg math, transaction assembly,
//! submission, confirmation, settlement, and the recalibration hand-off.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::domain::{Leg, Route, TokenSymbol, TradeRecord};
use crate::error::{Error, ExecutionError, Result};
use crate::port::{Instruction, SwapRequest, TradeEvent, Transaction, TxRecord, TxSignature};
use crate::state::SlippageSnapshot;

use super::EngineContext;

/// Program tag for the instruction carrying cycle audit metadata.
const AUDIT_PROGRAM: &str = "solarb.cycle-audit";

/// How often an in-flight attempt reports that it is still waiting.
const PROGRESS_INTERVAL_SECS: u64 = 5;

/// Inputs for one attempt, fixed at dispatch time.
#[derive(Debug, Clone)]
pub struct AttemptParams {
    pub route: Route,
    pub from_amount: Decimal,
    pub expected_end: Decimal,
    /// Build and price the legs but never submit; recalibrate from fresh
    /// quotes instead.
    pub simulate_only: bool,
}

/// Run one attempt to completion, absorbing its errors.
///
/// This is the attempt boundary of the error-handling design: whatever goes
/// wrong in here is logged with route context and never aborts sibling
/// attempts or the scheduler.
pub async fn execute_attempt(ctx: &EngineContext, params: AttemptParams) {
    let context = params.route.describe();
    let progress = spawn_progress_logger(context.clone());

    if let Err(e) = run(ctx, &params).await {
        error!(route = %context, error = %e, "Attempt failed");
    }

    progress.abort();
}

async fn run(ctx: &EngineContext, params: &AttemptParams) -> Result<()> {
    // Snapshot once so concurrent recalibration from sibling attempts cannot
    // shift factors mid-computation.
    let slippage = ctx.slippage.snapshot();
    let route = &params.route;

    let (tx, estimated) = build_transaction(ctx, params, &slippage).await?;

    if params.simulate_only {
        return simulate(ctx, route, params.from_amount, estimated).await;
    }

    let anchor = &ctx.settings.anchor;
    let before = anchor_balance(ctx, anchor).await?;

    info!(route = %route.describe(), amount = %params.from_amount, "Submitting transaction");
    let (signature, submission_failed) = match ctx.ledger.submit(&tx).await {
        Ok(signature) => (signature, false),
        Err(e) => match salvage_signature(&e.to_string()) {
            Some(signature) => {
                warn!(
                    route = %route.describe(),
                    signature = %signature,
                    error = %e,
                    "Submission rejected; salvaged signature for inspection"
                );
                (signature, true)
            }
            None => return Err(e),
        },
    };
    info!(signature = %signature, "Transaction submitted");

    let record = confirm(ctx, &signature).await?;

    // Recalibration is the defined synchronization point: both legs settle
    // before the attempt moves on to settlement and notification.
    match parse_leg_outputs(&record.logs, route) {
        Ok(realized) => {
            for leg in Leg::BOTH {
                let pool = route.pool_at(leg.index());
                ctx.recalibrator
                    .apply(pool.id(), leg, realized[leg.index()], estimated[leg.index()])
                    .await;
            }
        }
        Err(e) => error!(signature = %signature, error = %e, "Failed to parse transaction logs"),
    }

    if submission_failed {
        // The cycle never landed; the salvaged record was only good for
        // calibration, not for settlement or notification.
        return Ok(());
    }

    let after = anchor_balance(ctx, anchor).await?;
    let net_profit = after - before;

    ctx.notifiers.notify_all(&TradeEvent {
        route: route.describe(),
        transaction_id: signature.to_string(),
        net_profit,
    });

    let record = TradeRecord {
        starting_amount: before,
        ending_amount: after,
        net_profit,
        expected_profit: params.expected_end - params.from_amount,
        transaction_id: signature.to_string(),
        timestamp: chrono::Utc::now(),
    };
    if let Err(e) = ctx.audit.record(&record).await {
        warn!(error = %e, "Audit sink write failed");
    }

    Ok(())
}

/// Walk both legs in order, computing each leg's expected output under the
/// snapshotted slippage model and collecting the swap instructions into one
/// atomic transaction (unless simulate-only, where no instructions are
/// built). Returns the assembled transaction and the per-leg estimates.
async fn build_transaction(
    ctx: &EngineContext,
    params: &AttemptParams,
    slippage: &SlippageSnapshot,
) -> Result<(Transaction, [Decimal; 2])> {
    let route = &params.route;
    let mut tx = Transaction::new();
    let mut amount = params.from_amount;
    let mut estimated = [Decimal::ZERO; 2];

    for leg in Leg::BOTH {
        let pool = route.pool_at(leg.index());
        let quoted = pool.rate_for(leg);
        let factor = slippage.factor(pool.id(), leg);
        let output = amount * quoted.rate * factor;
        estimated[leg.index()] = output;

        // The second leg's minimum out is the cycle's starting amount: the
        // whole transaction must not close at a loss.
        let min_amount_out = match leg {
            Leg::First => output,
            Leg::Second => params.from_amount,
        };

        if !params.simulate_only {
            let adapter = ctx.venues.get(pool.venue())?;
            let swap = adapter
                .build_swap(&SwapRequest {
                    pool_address: pool.address().to_string(),
                    from: quoted.from.clone(),
                    to: quoted.to.clone(),
                    amount_in: amount,
                    min_amount_out,
                })
                .await?;
            tx.extend(swap);
        }

        debug!(
            pool = %pool.id(),
            leg = leg.index(),
            rate = %quoted.rate,
            factor = %factor,
            output = %output,
            "Leg priced"
        );

        amount = output;
    }

    tx.add(cycle_audit_instruction(route, params.from_amount, &estimated));

    Ok((tx, estimated))
}

/// Simulate-only calibration: fetch a fresh non-committing quote per leg and
/// recalibrate wherever it deviates from the estimate. No capital moves and
/// nothing is ever submitted.
async fn simulate(
    ctx: &EngineContext,
    route: &Route,
    from_amount: Decimal,
    estimated: [Decimal; 2],
) -> Result<()> {
    let mut amount = from_amount;

    for leg in Leg::BOTH {
        let pool = route.pool_at(leg.index());
        let quoted = pool.rate_for(leg);
        let adapter = ctx.venues.get(pool.venue())?;

        let realized = adapter.quote(&quoted.from, &quoted.to, amount).await?;
        let expected = estimated[leg.index()];

        if realized != expected {
            warn!(
                pool = %pool.id(),
                leg = leg.index(),
                realized = %realized,
                estimated = %expected,
                "Simulated quote deviates from estimate"
            );
            ctx.recalibrator
                .apply(pool.id(), leg, realized, expected)
                .await;
        }

        amount = expected;
    }

    Ok(())
}

/// Instruction carrying the cycle's audit metadata alongside the swaps.
fn cycle_audit_instruction(route: &Route, from_amount: Decimal, estimated: &[Decimal; 2]) -> Instruction {
    let data = format!(
        "{}->{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
        route.first().venue(),
        route.second().venue(),
        route.first().address(),
        route.second().address(),
        route.first().buy().from,
        route.intermediate(),
        from_amount,
        estimated[0],
        estimated[1],
    );
    Instruction {
        program: AUDIT_PROGRAM.to_string(),
        data,
    }
}

/// Block on finalization by polling the ledger, bounded by the configured
/// retry ceiling rather than a wall-clock timeout.
async fn confirm(ctx: &EngineContext, signature: &TxSignature) -> Result<TxRecord> {
    let polls = ctx.settings.max_confirmation_polls;
    let started = Instant::now();

    for _ in 0..polls {
        if let Some(record) = ctx.ledger.get_finalized(signature).await? {
            info!(
                signature = %signature,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Transaction finalized"
            );
            return Ok(record);
        }
        tokio::time::sleep(ctx.settings.confirmation_poll_interval).await;
    }

    Err(ExecutionError::ConfirmationTimeout {
        signature: signature.to_string(),
        polls,
    }
    .into())
}

/// Recover per-leg realized outputs from the finalized transaction's logs.
///
/// Each venue program logs its swap as `... pool=<pool_id> out=<amount>`.
/// Lines are consumed front to back so that a route trading the same pool
/// id twice would still pair logs with legs in execution order.
fn parse_leg_outputs(logs: &[String], route: &Route) -> std::result::Result<[Decimal; 2], ExecutionError> {
    let mut cursor = 0;
    let mut outputs = [Decimal::ZERO; 2];

    for leg in Leg::BOTH {
        let pool = route.pool_at(leg.index());
        let needle = format!("pool={}", pool.id());

        let mut found = None;
        for (offset, line) in logs[cursor..].iter().enumerate() {
            if !line.contains(&needle) {
                continue;
            }
            let amount = line
                .split("out=")
                .nth(1)
                .and_then(|rest| rest.split_whitespace().next())
                .and_then(|raw| raw.parse::<Decimal>().ok())
                .ok_or_else(|| {
                    ExecutionError::LogParse(format!("unparseable swap log line: {line}"))
                })?;
            found = Some((cursor + offset + 1, amount));
            break;
        }

        match found {
            Some((next_cursor, amount)) => {
                cursor = next_cursor;
                outputs[leg.index()] = amount;
            }
            None => {
                return Err(ExecutionError::LogParse(format!(
                    "no swap log found for {}",
                    pool.id()
                )))
            }
        }
    }

    Ok(outputs)
}

/// Pull a transaction signature out of a rejection message, when the ledger
/// embeds one (`... Transaction <signature> failed ...`).
fn salvage_signature(message: &str) -> Option<TxSignature> {
    let rest = message.split("Transaction ").nth(1)?;
    if !rest.contains(" failed") {
        return None;
    }
    let signature = rest.split(" failed").next()?.trim();
    if signature.is_empty() {
        return None;
    }
    Some(TxSignature(signature.to_string()))
}

async fn anchor_balance(ctx: &EngineContext, anchor: &TokenSymbol) -> Result<Decimal> {
    ctx.ledger
        .token_balance(anchor)
        .await?
        .ok_or_else(|| {
            Error::from(ExecutionError::MissingAccount {
                token: anchor.to_string(),
            })
        })
}

fn spawn_progress_logger(route: String) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let started = Instant::now();
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(PROGRESS_INTERVAL_SECS));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!(
                route = %route,
                elapsed_secs = started.elapsed().as_secs(),
                "Still waiting on attempt"
            );
        }
    })
}
