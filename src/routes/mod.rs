//! Route discovery: enumeration of candidate two-hop cycles and profit
//! estimation under the slippage model.

mod enumerate;
mod estimate;

pub use enumerate::group_by_intermediate;
pub use estimate::{best_route_per_token, candidate_routes, estimate_profit};
