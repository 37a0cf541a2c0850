//! Pool Graph Construction
//!
//! Enumerates candidate routes between every token pair reachable through
//! the registered pools.

use std::collections::{BTreeMap, HashSet, VecDeque};

use splitroute_core::{PoolGraph, PoolId, PoolRegistry, Route, TokenId, MAX_HOPS};

/// Token adjacency: token -> [(pool, token on the other side)], ordered by pool id.
type Adjacency<'a> = BTreeMap<&'a TokenId, Vec<(&'a PoolId, &'a TokenId)>>;

fn adjacency(registry: &PoolRegistry) -> Adjacency<'_> {
    let mut adjacency: Adjacency<'_> = BTreeMap::new();
    for (pool_id, info) in registry.iter() {
        if info.token_a == info.token_b {
            continue;
        }
        adjacency
            .entry(&info.token_a)
            .or_default()
            .push((pool_id, &info.token_b));
        adjacency
            .entry(&info.token_b)
            .or_default()
            .push((pool_id, &info.token_a));
    }
    for edges in adjacency.values_mut() {
        edges.sort();
    }
    adjacency
}

/// Find all acyclic routes from `source` to `target`, up to `max_hops` pools.
///
/// Uses BFS with visited-token tracking. No token is revisited and no pool is
/// used more than once in a route. Shorter routes come first.
pub fn find_routes(
    registry: &PoolRegistry,
    source: &TokenId,
    target: &TokenId,
    max_hops: usize,
) -> Vec<Route> {
    let adjacency = adjacency(registry);
    let mut routes = Vec::new();
    walk_routes(&adjacency, source, max_hops, |token, path| {
        if token == target {
            routes.push(Route::new(path.to_vec()));
        }
    });
    routes
}

/// Build the candidate route graph for every pair in the registry.
///
/// Routes are stored oriented from the pair's smaller token id.
pub fn build_pool_graph(registry: &PoolRegistry, max_hops: usize) -> PoolGraph {
    let adjacency = adjacency(registry);
    let mut graph = PoolGraph::new();

    for &source in adjacency.keys() {
        walk_routes(&adjacency, source, max_hops, |token, path| {
            if source < token {
                graph.add_route(source, token, Route::new(path.to_vec()));
            }
        });
    }

    tracing::info!(
        "Built pool graph: {} pools, {} token pairs",
        registry.len(),
        graph.pair_count()
    );
    graph
}

/// Visit every acyclic path leaving `source`, calling `visit` with the token
/// reached and the pools taken.
fn walk_routes<'a, F>(adjacency: &Adjacency<'a>, source: &'a TokenId, max_hops: usize, mut visit: F)
where
    F: FnMut(&'a TokenId, &[PoolId]),
{
    let max_hops = max_hops.min(MAX_HOPS);
    let mut queue: VecDeque<(&TokenId, Vec<PoolId>, HashSet<&TokenId>)> = VecDeque::new();
    queue.push_back((source, Vec::new(), HashSet::from([source])));

    while let Some((current, path, visited)) = queue.pop_front() {
        let Some(edges) = adjacency.get(current) else {
            continue;
        };
        for &(pool_id, next) in edges {
            if visited.contains(next) || path.contains(pool_id) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(pool_id.clone());
            visit(next, &next_path);

            if next_path.len() < max_hops {
                let mut next_visited = visited.clone();
                next_visited.insert(next);
                queue.push_back((next, next_path, next_visited));
            }
        }
    }
}
