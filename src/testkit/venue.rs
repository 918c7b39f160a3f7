//! Mock venue adapter with scripted quotes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{TokenSymbol, Venue};
use crate::error::{Error, ExecutionError, Result};
use crate::port::{Instruction, SwapInstructions, SwapRequest, VenueAdapter};

/// Venue adapter that answers quotes from a pre-loaded queue and records
/// every swap it is asked to build.
///
/// Quotes pop front to back; an exhausted queue fails the quote, which is
/// also how a dead venue API is simulated.
pub struct ScriptedVenue {
    venue: Venue,
    quotes: Mutex<VecDeque<Result<Decimal>>>,
    requests: Mutex<Vec<SwapRequest>>,
    quote_count: AtomicU32,
    build_count: AtomicU32,
}

impl ScriptedVenue {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            quotes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            quote_count: AtomicU32::new(0),
            build_count: AtomicU32::new(0),
        }
    }

    pub fn with_quotes(self, quotes: Vec<Decimal>) -> Self {
        *self.quotes.lock() = quotes.into_iter().map(Ok).collect();
        self
    }

    pub fn with_quote_results(self, quotes: Vec<Result<Decimal>>) -> Self {
        *self.quotes.lock() = quotes.into();
        self
    }

    pub fn quote_count(&self) -> u32 {
        self.quote_count.load(Ordering::SeqCst)
    }

    pub fn build_count(&self) -> u32 {
        self.build_count.load(Ordering::SeqCst)
    }

    /// Every swap request seen so far, in call order.
    pub fn requests(&self) -> Vec<SwapRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl VenueAdapter for ScriptedVenue {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn quote(
        &self,
        from: &TokenSymbol,
        to: &TokenSymbol,
        _amount_in: Decimal,
    ) -> Result<Decimal> {
        self.quote_count.fetch_add(1, Ordering::SeqCst);
        self.quotes.lock().pop_front().unwrap_or_else(|| {
            Err(Error::from(ExecutionError::QuoteFailed {
                from: from.to_string(),
                to: to.to_string(),
                reason: "quote script exhausted".to_string(),
            }))
        })
    }

    async fn build_swap(&self, request: &SwapRequest) -> Result<SwapInstructions> {
        self.build_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        Ok(SwapInstructions {
            instructions: vec![Instruction {
                program: format!("test.{}", self.venue),
                data: format!(
                    "swap addr={} in={} min={}",
                    request.pool_address, request.amount_in, request.min_amount_out
                ),
            }],
            signers: Vec::new(),
        })
    }
}
