//! Notification and audit ports.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::TradeRecord;
use crate::error::Result;

/// Fire-and-forget event describing a settled trade.
#[derive(Debug, Clone)]
pub struct TradeEvent {
    /// `POOL_A -> POOL_B` route description.
    pub route: String,
    pub transaction_id: String,
    pub net_profit: Decimal,
}

/// Outbound notification sink. Delivery failures are logged by the
/// implementation and never surface to the attempt.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: TradeEvent);
}

/// Fan-out over every configured notifier.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn notify_all(&self, event: &TradeEvent) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// Append-only trade-history sink.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &TradeRecord) -> Result<()>;
}
