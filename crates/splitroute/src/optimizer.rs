//! Route Optimizer
//!
//! Drives one routing call end to end: validation, a single state prefetch,
//! the hop-by-hop quote loop, aggregation, pruning, and ranking.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use splitroute_core::{
    PoolGraph, PoolId, PoolRegistry, RouteOptions, RouterConfig, RouterError, TokenId,
};

use crate::aggregate::{aggregate_quotes, FailureSet};
use crate::arena::{orient_routes, OrientedRoute, QuoteArena};
use crate::batch::build_hop_batch;
use crate::engine::{QuoteEngine, StateFetcher};
use crate::executor::execute_hop;
use crate::prune::prune_buckets;
use crate::quote::SplitRoute;
use crate::rank::rank_split_routes;
use crate::slicer::slice_amount;
use crate::state::{plan_window_keys, PrefetchedState};

/// A trade to route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub input_token: TokenId,
    pub output_token: TokenId,
    pub amount: u64,
    /// `true` when `amount` is the exact input, `false` when it is the
    /// exact output
    pub amount_is_input: bool,
}

impl RouteRequest {
    pub fn exact_in(input_token: TokenId, output_token: TokenId, amount: u64) -> Self {
        Self {
            input_token,
            output_token,
            amount,
            amount_is_input: true,
        }
    }

    pub fn exact_out(input_token: TokenId, output_token: TokenId, amount: u64) -> Self {
        Self {
            input_token,
            output_token,
            amount,
            amount_is_input: false,
        }
    }
}

/// Split-route optimizer over a state fetcher and a quote engine.
///
/// Holds no per-call state; one instance may serve concurrent calls if its
/// collaborators allow it.
pub struct RouteOptimizer<F, E> {
    fetcher: F,
    engine: E,
    defaults: RouterConfig,
}

impl<F, E> RouteOptimizer<F, E>
where
    F: StateFetcher,
    E: QuoteEngine,
{
    pub fn new(fetcher: F, engine: E) -> Self {
        Self {
            fetcher,
            engine,
            defaults: RouterConfig::default(),
        }
    }

    /// Replace the configuration that per-call options are merged over.
    pub fn with_config(mut self, defaults: RouterConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.defaults
    }

    /// Find the best ways to execute `request`, best first.
    ///
    /// An empty list means no route could be quoted for reasons other than
    /// liquidity; callers should treat it as "no route found".
    pub async fn find_best_routes(
        &self,
        request: &RouteRequest,
        graph: &PoolGraph,
        registry: &PoolRegistry,
        options: Option<&RouteOptions>,
    ) -> Result<Vec<SplitRoute>, RouterError> {
        let routes = graph
            .routes_for(&request.input_token, &request.output_token)
            .filter(|routes| !routes.is_empty())
            .ok_or_else(|| RouterError::RouteDoesNotExist {
                input: request.input_token.clone(),
                output: request.output_token.clone(),
            })?;
        if request.amount == 0 {
            return Err(RouterError::ZeroInputAmount);
        }

        let config = match options {
            Some(options) => self.defaults.merged(options),
            None => self.defaults.clone(),
        };
        config.validate()?;

        tracing::info!(
            "Routing {} {} -> {} ({}) across {} candidate routes",
            request.amount,
            request.input_token,
            request.output_token,
            if request.amount_is_input {
                "exact in"
            } else {
                "exact out"
            },
            routes.len()
        );

        let oriented = orient_routes(routes, registry, &request.input_token)?;
        let prefetched = self.prefetch(&oriented, registry).await?;
        let slices = slice_amount(request.amount, config.percent_increment)?;
        let mut arena = QuoteArena::new(slices, oriented);

        for step in 0..arena.max_route_len() {
            let batch = build_hop_batch(
                &arena,
                step,
                request.amount_is_input,
                &request.input_token,
                &request.output_token,
                &prefetched,
            )?;
            if batch.is_empty() {
                tracing::debug!("Hop step {}: no chains left to quote", step);
                break;
            }
            let failed = execute_hop(&self.engine, &batch, &mut arena).await?;
            tracing::debug!(
                "Hop step {}: quoted {} requests, {} failed",
                step,
                batch.len(),
                failed
            );
        }

        let mut failures = FailureSet::new();
        let buckets = aggregate_quotes(&arena, request.amount_is_input, &mut failures);
        let complete: usize = buckets.iter().map(|b| b.quotes.len()).sum();
        tracing::debug!(
            "Aggregated {} complete route quotes; failure kinds: {:?}",
            complete,
            failures
        );

        let pruned = prune_buckets(
            &buckets,
            request.amount_is_input,
            config.num_top_partial_quotes,
        );
        let full_bucket = buckets.iter().find(|b| b.percent == 100);
        let ranked = rank_split_routes(
            &pruned,
            full_bucket,
            request.amount_is_input,
            config.effective_max_splits(),
            config.num_top_routes,
        );

        if ranked.is_empty() {
            if failures.iter().any(|kind| kind.is_liquidity_exhaustion()) {
                tracing::warn!(
                    "No route for {} {} -> {}: liquidity exhausted",
                    request.amount,
                    request.input_token,
                    request.output_token
                );
                return Err(RouterError::TradeAmountTooHigh);
            }
            tracing::warn!(
                "No route for {} {} -> {}",
                request.amount,
                request.input_token,
                request.output_token
            );
        } else {
            tracing::info!("Found {} ranked split routes", ranked.len());
        }

        Ok(ranked)
    }

    /// Fetch every pool and window any candidate route may touch.
    async fn prefetch(
        &self,
        routes: &[OrientedRoute],
        registry: &PoolRegistry,
    ) -> Result<PrefetchedState, RouterError> {
        let pool_ids: Vec<PoolId> = routes
            .iter()
            .flat_map(|r| r.route.pools().iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let window_keys = plan_window_keys(&pool_ids, registry)?;

        let pools = self.fetcher.prefetch_pools(&pool_ids).await?;
        let windows = self
            .fetcher
            .prefetch_price_range_windows(&window_keys)
            .await?;
        let prefetched = PrefetchedState::new(pools, windows);
        tracing::debug!(
            "Prefetched {}/{} pools and {}/{} price-range windows",
            prefetched.pool_count(),
            pool_ids.len(),
            prefetched.window_count(),
            window_keys.len()
        );

        Ok(prefetched)
    }
}
