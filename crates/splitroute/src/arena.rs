//! Quote Arena
//!
//! Per-call storage of hop results, one chain per (slice, route), sized once
//! up front and never resized.

use splitroute_core::{PoolRegistry, Route, RouterError, TokenId};

use crate::quote::HopResult;
use crate::slicer::Slice;

/// A candidate route aligned so that its first pool holds the input token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedRoute {
    /// Position in the pool graph's candidate list
    pub index: usize,
    pub route: Route,
    /// Whether the stored route had to be reversed
    pub reversed: bool,
}

/// Align every candidate route with `input_token`.
///
/// A route whose first pool does not hold the input token is reversed.
/// Pools missing from the registry abort the call.
pub fn orient_routes(
    routes: &[Route],
    registry: &PoolRegistry,
    input_token: &TokenId,
) -> Result<Vec<OrientedRoute>, RouterError> {
    routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let first = route
                .first()
                .ok_or_else(|| RouterError::general(format!("route {} is empty", index)))?;
            let info = registry.get(first).ok_or_else(|| {
                RouterError::general(format!("pool {} is not registered", first))
            })?;
            let reversed = !info.contains(input_token);
            if reversed {
                tracing::debug!("Reversing route {} ({}) to start at {}", index, route, input_token);
            }
            Ok(OrientedRoute {
                index,
                route: if reversed { route.reversed() } else { route.clone() },
                reversed,
            })
        })
        .collect()
}

/// Hop results for one route at one slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopChain {
    hops: Vec<Option<HopResult>>,
}

impl HopChain {
    fn new(len: usize) -> Self {
        Self {
            hops: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&HopResult> {
        self.hops.get(position).and_then(Option::as_ref)
    }

    pub fn set(&mut self, position: usize, result: HopResult) {
        if let Some(slot) = self.hops.get_mut(position) {
            *slot = Some(result);
        }
    }

    pub fn hops(&self) -> impl Iterator<Item = Option<&HopResult>> {
        self.hops.iter().map(Option::as_ref)
    }
}

/// Hop chains indexed by (slice bucket, route)
#[derive(Debug, Clone)]
pub struct QuoteArena {
    slices: Vec<Slice>,
    routes: Vec<OrientedRoute>,
    chains: Vec<HopChain>,
}

impl QuoteArena {
    pub fn new(slices: Vec<Slice>, routes: Vec<OrientedRoute>) -> Self {
        let chains = slices
            .iter()
            .flat_map(|_| routes.iter().map(|r| HopChain::new(r.route.len())))
            .collect();
        Self {
            slices,
            routes,
            chains,
        }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn routes(&self) -> &[OrientedRoute] {
        &self.routes
    }

    pub fn max_route_len(&self) -> usize {
        self.routes.iter().map(|r| r.route.len()).max().unwrap_or(0)
    }

    fn offset(&self, bucket: usize, route: usize) -> usize {
        bucket * self.routes.len() + route
    }

    pub fn chain(&self, bucket: usize, route: usize) -> &HopChain {
        &self.chains[self.offset(bucket, route)]
    }

    pub fn chain_mut(&mut self, bucket: usize, route: usize) -> &mut HopChain {
        let offset = self.offset(bucket, route);
        &mut self.chains[offset]
    }
}
