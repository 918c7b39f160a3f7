//! Collecting notifier and audit sinks.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::TradeRecord;
use crate::error::Result;
use crate::port::{AuditSink, Notifier, TradeEvent};

/// Notifier that stores every event for later assertion. Clones share the
/// same buffer, so a test can keep one handle while the registry owns another.
#[derive(Clone, Default)]
pub struct CollectingNotifier {
    events: Arc<Mutex<Vec<TradeEvent>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TradeEvent> {
        self.events.lock().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, event: TradeEvent) {
        self.events.lock().push(event);
    }
}

/// Audit sink that stores every record for later assertion.
#[derive(Clone, Default)]
pub struct CollectingAudit {
    records: Arc<Mutex<Vec<TradeRecord>>>,
}

impl CollectingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TradeRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl AuditSink for CollectingAudit {
    async fn record(&self, record: &TradeRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
