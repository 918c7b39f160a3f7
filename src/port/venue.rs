//! Venue adapter port and registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{TokenSymbol, Venue};
use crate::error::{ExecutionError, Result};
use crate::port::ledger::{Instruction, Signer};

/// Everything an adapter needs to encode one swap leg.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// Venue-specific pool address the swap routes through.
    pub pool_address: String,
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    pub amount_in: Decimal,
    pub min_amount_out: Decimal,
}

/// Encoded swap leg: instructions to append to the outgoing transaction and
/// any extra signing authorities they require.
#[derive(Debug, Clone, Default)]
pub struct SwapInstructions {
    pub instructions: Vec<Instruction>,
    pub signers: Vec<Signer>,
}

/// One DEX venue's quoting and instruction-building interface.
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    fn venue(&self) -> Venue;

    /// Non-committing quote: expected output for `amount_in`.
    async fn quote(
        &self,
        from: &TokenSymbol,
        to: &TokenSymbol,
        amount_in: Decimal,
    ) -> Result<Decimal>;

    /// Encode the swap instructions for one leg.
    async fn build_swap(&self, request: &SwapRequest) -> Result<SwapInstructions>;
}

/// Closed mapping from [`Venue`] to its adapter, built once at startup.
#[derive(Clone, Default)]
pub struct VenueRegistry {
    adapters: HashMap<Venue, Arc<dyn VenueAdapter>>,
}

impl VenueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn VenueAdapter>) {
        self.adapters.insert(adapter.venue(), adapter);
    }

    pub fn get(&self, venue: Venue) -> Result<&Arc<dyn VenueAdapter>> {
        self.adapters
            .get(&venue)
            .ok_or_else(|| ExecutionError::UnknownVenue(venue.to_string()).into())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
