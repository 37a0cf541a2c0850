//! Core type definitions for Splitroute

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Maximum number of pools a single route may traverse.
pub const MAX_HOPS: usize = 3;

/// Token mint identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Liquidity pool identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static pool metadata from the pool registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    pub token_a: TokenId,
    pub token_b: TokenId,
    /// Reserve account holding `token_a`
    pub vault_a: String,
    /// Reserve account holding `token_b`
    pub vault_b: String,
    pub tick_current_index: i32,
    pub tick_spacing: u16,
    /// On-chain address of the pool
    pub address: String,
}

impl PoolInfo {
    pub fn contains(&self, token: &TokenId) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// The token on the other side of the pool, or `None` if `token` is not
    /// one of its sides.
    pub fn other_side(&self, token: &TokenId) -> Option<&TokenId> {
        if self.token_a == *token {
            Some(&self.token_b)
        } else if self.token_b == *token {
            Some(&self.token_a)
        } else {
            None
        }
    }
}

/// Pool metadata keyed by pool id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolRegistry {
    pools: HashMap<PoolId, PoolInfo>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PoolId, info: PoolInfo) -> Option<PoolInfo> {
        self.pools.insert(id, info)
    }

    pub fn get(&self, id: &PoolId) -> Option<&PoolInfo> {
        self.pools.get(id)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PoolId, &PoolInfo)> {
        self.pools.iter()
    }
}

impl FromIterator<(PoolId, PoolInfo)> for PoolRegistry {
    fn from_iter<I: IntoIterator<Item = (PoolId, PoolInfo)>>(iter: I) -> Self {
        Self {
            pools: iter.into_iter().collect(),
        }
    }
}

/// An ordered chain of pools connecting two tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(pub Vec<PoolId>);

impl Route {
    pub fn new(pools: Vec<PoolId>) -> Self {
        Self(pools)
    }

    pub fn pools(&self) -> &[PoolId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&PoolId> {
        self.0.first()
    }

    /// The same pools traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().cloned().collect())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.0.iter().map(PoolId::as_str).collect();
        write!(f, "{}", ids.join(" -> "))
    }
}

/// Direction-agnostic key for a token pair.
///
/// The smaller token (by id) is always stored first so that `(a, b)` and
/// `(b, a)` resolve to the same graph entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub first: TokenId,
    pub second: TokenId,
}

impl PairKey {
    pub fn new(a: &TokenId, b: &TokenId) -> Self {
        if a <= b {
            Self {
                first: a.clone(),
                second: b.clone(),
            }
        } else {
            Self {
                first: b.clone(),
                second: a.clone(),
            }
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Precomputed candidate routes per token pair.
///
/// Routes may be stored in either orientation; callers reorient them
/// against the trade's input token before quoting.
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    routes: HashMap<PairKey, Vec<Route>>,
}

impl PoolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route for a pair. Empty routes and routes longer than
    /// [`MAX_HOPS`] are ignored.
    pub fn add_route(&mut self, a: &TokenId, b: &TokenId, route: Route) {
        if route.is_empty() || route.len() > MAX_HOPS {
            return;
        }
        self.routes.entry(PairKey::new(a, b)).or_default().push(route);
    }

    pub fn routes_for(&self, a: &TokenId, b: &TokenId) -> Option<&[Route]> {
        self.routes.get(&PairKey::new(a, b)).map(Vec::as_slice)
    }

    pub fn pair_count(&self) -> usize {
        self.routes.len()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey, &[Route])> {
        self.routes.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
