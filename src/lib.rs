//! Solarb - Two-hop DEX arbitrage engine with slippage auto-calibration.
//!
//! The engine cycles an anchor token (a stablecoin by default) through pairs
//! of pools that share an intermediate token, estimating round-trip profit
//! from quoted rates and a learned per-pool slippage model, and executing the
//! best route per intermediate as a single atomic two-leg transaction.
//!
//! # Architecture
//!
//! Every tick the scheduler snapshots the price book, enumerates candidate
//! two-hop routes, ranks them by estimated profit, and dispatches one attempt
//! per intermediate token. Each attempt settles against the chain, compares
//! realized leg outputs to the estimates, and overwrites the slippage factors
//! with the observed ratio. The next tick prices with the corrected factors.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with env and CLI overrides
//! - [`domain`] - Pools, venues, routes, and trade records
//! - [`state`] - Shared caches: price book, slippage model, token allow-list
//! - [`routes`] - Route enumeration and profit estimation
//! - [`engine`] - Tick scheduler, attempt execution, recalibration
//! - [`port`] - Trait boundaries for feeds, stores, venues, ledger, delivery
//! - [`adapter`] - Paper-trading backends, webhook notifier, JSONL audit sink
//! - [`error`] - Error types for the crate

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod port;
pub mod routes;
pub mod state;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
