//! Trade-history audit sinks.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::domain::TradeRecord;
use crate::error::Result;
use crate::port::AuditSink;

/// Append-only JSON-lines trade history on local disk.
pub struct JsonlAuditSink {
    path: PathBuf,
    writes: tokio::sync::Mutex<()>,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writes: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn record(&self, record: &TradeRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        // Serialize appends from concurrent attempts.
        let _guard = self.writes.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Sink that drops every record. Useful in tests and detection-only runs.
pub struct NullAuditSink;

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn record(&self, _record: &TradeRecord) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn appends_one_json_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.jsonl");
        let sink = JsonlAuditSink::new(&path);

        let record = TradeRecord {
            starting_amount: dec!(5),
            ending_amount: dec!(5.02),
            net_profit: dec!(0.02),
            expected_profit: dec!(0.02),
            transaction_id: "sig-1".to_string(),
            timestamp: chrono::Utc::now(),
        };

        sink.record(&record).await.unwrap();
        sink.record(&record).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["transaction_id"], "sig-1");
        assert_eq!(parsed["net_profit"], "0.02");
    }
}
