//! Ledger port: transaction submission and finalized-record lookup.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::TokenSymbol;
use crate::error::Result;

/// One instruction in an outgoing transaction. Venue-specific encoding lives
/// behind the adapters; the engine only moves opaque payloads around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Program the instruction targets.
    pub program: String,
    /// Opaque payload, adapter-encoded.
    pub data: String,
}

/// A signing authority required by an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer(pub String);

/// An atomic transaction bundle: every instruction lands or none do.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Signer>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn extend(&mut self, swap: super::SwapInstructions) {
        self.instructions.extend(swap.instructions);
        self.signers.extend(swap.signers);
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// A submitted transaction's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxSignature(pub String);

impl TxSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The finalized record of a confirmed transaction.
#[derive(Debug, Clone)]
pub struct TxRecord {
    /// Raw log lines emitted during execution, in program order.
    pub logs: Vec<String>,
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submit an atomic transaction; returns its signature on acceptance.
    async fn submit(&self, tx: &Transaction) -> Result<TxSignature>;

    /// Fetch the finalized record, or `None` while still unconfirmed.
    async fn get_finalized(&self, signature: &TxSignature) -> Result<Option<TxRecord>>;

    /// Wallet balance of `token`, or `None` when no account exists for it.
    async fn token_balance(&self, token: &TokenSymbol) -> Result<Option<Decimal>>;
}
