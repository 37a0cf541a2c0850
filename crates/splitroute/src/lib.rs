//! Split-Route Optimizer
//!
//! This crate finds the best ways to execute a swap across concentrated
//! liquidity pools, splitting the trade over several routes when that
//! yields a better price.

pub mod aggregate;
pub mod arena;
pub mod batch;
pub mod calculator;
pub mod constant_product;
pub mod engine;
pub mod executor;
pub mod graph;
pub mod optimizer;
pub mod prune;
pub mod quote;
pub mod rank;
pub mod response;
pub mod slicer;
pub mod state;

#[cfg(test)]
mod test_support;

// Re-exports
pub use constant_product::{ConstantProductEngine, InMemoryStateFetcher};
pub use engine::{EngineQuote, EngineResult, HopQuoteParams, QuoteEngine, StateFetcher};
pub use graph::{build_pool_graph, find_routes};
pub use optimizer::{RouteOptimizer, RouteRequest};
pub use quote::{HopQuote, HopResult, QuoteBucket, RouteQuote, SplitRoute};
pub use response::RouteResponse;
pub use state::{InitializedTick, PoolState, PriceRangeWindow, PrefetchedState, WindowKey};
