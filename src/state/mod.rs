//! Process-wide shared state: the price book, the slippage model, and the
//! valid-token allow-list.
//!
//! Each store owns its map behind a [`parking_lot::RwLock`] that serializes
//! reads and writes; readers receive copy-on-read snapshots rather than
//! references into the live structures, so feed callbacks and recalibration
//! writes cannot shift values under an in-flight computation.

mod prices;
mod slippage;
mod tokens;

pub use prices::PriceBook;
pub use slippage::{SlippageModel, SlippageSnapshot};
pub use tokens::AllowList;
