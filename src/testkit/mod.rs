//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] — Builders for pools and routes.
//! - [`venue`] — `ScriptedVenue`, a mock venue adapter with scripted quotes
//!   and call counters.
//! - [`ledger`] — `ScriptedLedger`, a mock ledger with scripted submission
//!   results, finalized records, and balance reads.
//! - [`capture`] — Collecting notifier and audit sinks.
//! - [`context`] — `ContextBuilder` assembling a full engine context around
//!   the mocks.

pub mod capture;
pub mod context;
pub mod domain;
pub mod ledger;
pub mod venue;

pub use capture::{CollectingAudit, CollectingNotifier};
pub use context::ContextBuilder;
pub use domain::{pool, rates, route};
pub use ledger::ScriptedLedger;
pub use venue::ScriptedVenue;
