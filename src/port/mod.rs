//! Trait boundaries for the external collaborators: price feed, slippage
//! store, venue adapters, ledger, notification, and audit sinks.
//!
//! These are the integration points for real backends; the engine only ever
//! sees trait objects.

mod feed;
mod ledger;
mod notifier;
mod store;
mod venue;

pub use feed::{PriceFeed, PriceUpdate};
pub use ledger::{Instruction, Ledger, Signer, Transaction, TxRecord, TxSignature};
pub use notifier::{AuditSink, Notifier, NotifierRegistry, TradeEvent};
pub use store::{SlippageStore, SlippageUpdate};
pub use venue::{SwapInstructions, SwapRequest, VenueAdapter, VenueRegistry};
