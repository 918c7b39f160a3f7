//! Concrete collaborator implementations shipped with the binary: log and
//! webhook notifiers, the JSONL audit sink, and the paper-trading backends
//! used when no live venue integration is wired in.

mod audit;
mod notify;
mod paper;

pub use audit::{JsonlAuditSink, NullAuditSink};
pub use notify::{LogNotifier, WebhookNotifier};
pub use paper::{MemorySlippageStore, PaperLedger, PaperVenue, StaticFeed};
