//! Mock ledger with scripted submissions, finalizations, and balances.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::TokenSymbol;
use crate::error::Result;
use crate::port::{Ledger, Transaction, TxRecord, TxSignature};

/// Ledger whose responses are all pre-loaded by the test.
///
/// Submissions pop scripted results (defaulting to `Ok(tx-<n>)` when the
/// queue is exhausted), finalized lookups read a fixed record map, and
/// balance reads pop a queue, returning `None` once it runs dry.
pub struct ScriptedLedger {
    submit_results: Mutex<VecDeque<Result<TxSignature>>>,
    finalized: Mutex<HashMap<String, TxRecord>>,
    balances: Mutex<VecDeque<Decimal>>,
    submitted: Mutex<Vec<Transaction>>,
    submit_count: AtomicU32,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self {
            submit_results: Mutex::new(VecDeque::new()),
            finalized: Mutex::new(HashMap::new()),
            balances: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            submit_count: AtomicU32::new(0),
        }
    }

    pub fn with_submit_results(self, results: Vec<Result<TxSignature>>) -> Self {
        *self.submit_results.lock() = results.into();
        self
    }

    /// Mark `signature` as finalized with the given log lines.
    pub fn with_finalized(self, signature: &str, logs: Vec<&str>) -> Self {
        self.finalized.lock().insert(
            signature.to_string(),
            TxRecord {
                logs: logs.into_iter().map(str::to_string).collect(),
            },
        );
        self
    }

    /// Script the sequence of anchor balance reads.
    pub fn with_balances(self, balances: Vec<Decimal>) -> Self {
        *self.balances.lock() = balances.into();
        self
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count.load(Ordering::SeqCst)
    }

    /// Every submitted transaction, in call order.
    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().clone()
    }
}

impl Default for ScriptedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for ScriptedLedger {
    async fn submit(&self, tx: &Transaction) -> Result<TxSignature> {
        let sequence = self.submit_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.submitted.lock().push(tx.clone());
        self.submit_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(TxSignature(format!("tx-{sequence}"))))
    }

    async fn get_finalized(&self, signature: &TxSignature) -> Result<Option<TxRecord>> {
        Ok(self.finalized.lock().get(signature.as_str()).cloned())
    }

    async fn token_balance(&self, _token: &TokenSymbol) -> Result<Option<Decimal>> {
        Ok(self.balances.lock().pop_front())
    }
}
