//! Notification sinks: structured log output and an HTTP webhook.

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::port::{Notifier, TradeEvent};

/// Notifier that only writes to the log stream.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: TradeEvent) {
        info!(
            route = %event.route,
            transaction_id = %event.transaction_id,
            net_profit = %event.net_profit,
            "Trade succeeded"
        );
    }
}

/// Fire-and-forget webhook notifier (Discord-style JSON POST).
///
/// Events are handed to a background worker over a channel so notification
/// latency never blocks an attempt; delivery failures are logged and
/// otherwise ignored.
pub struct WebhookNotifier {
    sender: mpsc::UnboundedSender<TradeEvent>,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(webhook_worker(url, receiver));
        Self { sender }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, event: TradeEvent) {
        if self.sender.send(event).is_err() {
            warn!("Webhook notifier channel closed");
        }
    }
}

async fn webhook_worker(url: String, mut receiver: mpsc::UnboundedReceiver<TradeEvent>) {
    let client = reqwest::Client::new();
    info!("Webhook notifier started");

    while let Some(event) = receiver.recv().await {
        let body = json!({
            "content": format!(
                "Trade succeeded: {} (net {} anchor)\nhttps://solscan.io/tx/{}",
                event.route, event.net_profit, event.transaction_id
            ),
        });

        if let Err(e) = client.post(&url).json(&body).send().await {
            error!(error = %e, "Failed to deliver webhook notification");
        }
    }

    warn!("Webhook worker shutting down");
}
