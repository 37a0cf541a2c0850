//! Route Combination Ranker
//!
//! Combines pruned route quotes from different percentage buckets into
//! splits that cover the whole trade, then ranks them.

use std::cmp::Ordering;

use crate::quote::{QuoteBucket, RouteQuote, SplitRoute};

struct Candidate<'a> {
    members: Vec<&'a RouteQuote>,
    amount_in: u64,
    amount_out: u64,
}

impl<'a> Candidate<'a> {
    fn new(members: Vec<&'a RouteQuote>) -> Self {
        let amount_in = members.iter().map(|q| q.amount_in).fold(0u64, u64::saturating_add);
        let amount_out = members.iter().map(|q| q.amount_out).fold(0u64, u64::saturating_add);
        Self {
            members,
            amount_in,
            amount_out,
        }
    }
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>, amount_is_input: bool) -> Ordering {
    let by_amount = if amount_is_input {
        b.amount_out.cmp(&a.amount_out)
    } else {
        a.amount_in.cmp(&b.amount_in)
    };
    by_amount.then(a.members.len().cmp(&b.members.len()))
}

/// Rank every way of covering 100% of the trade.
///
/// Splits draw at most `max_splits` quotes from `pruned`, in non-increasing
/// percentage order, never reusing a quote or a pool. Single-hop quotes from
/// the unpruned 100% bucket (`full_bucket`) are always candidates too, so
/// pruning cannot hide the plain one-pool trade. Results are best-first and
/// capped at `top_n`; ties prefer fewer splits, then generation order.
pub fn rank_split_routes(
    pruned: &[QuoteBucket],
    full_bucket: Option<&QuoteBucket>,
    amount_is_input: bool,
    max_splits: usize,
    top_n: usize,
) -> Vec<SplitRoute> {
    let mut order: Vec<usize> = (0..pruned.len()).collect();
    order.sort_by(|&a, &b| pruned[b].percent.cmp(&pruned[a].percent));

    let mut candidates = Vec::new();
    let mut current = Vec::new();
    collect_splits(
        pruned,
        &order,
        max_splits.max(1),
        &mut current,
        0,
        &mut candidates,
    );
    let generated = candidates.len();

    if let Some(full) = full_bucket {
        let already_whole: Vec<usize> = pruned
            .iter()
            .filter(|b| b.percent == 100)
            .flat_map(|b| b.quotes.iter().map(|q| q.route_index))
            .collect();
        candidates.extend(
            full.quotes
                .iter()
                .filter(|q| q.hops.len() == 1 && !already_whole.contains(&q.route_index))
                .map(|q| Candidate::new(vec![q])),
        );
    }

    tracing::debug!(
        "Ranking {} generated splits and {} single-hop candidates",
        generated,
        candidates.len() - generated
    );

    candidates.sort_by(|a, b| compare_candidates(a, b, amount_is_input));
    candidates.truncate(top_n);
    candidates
        .into_iter()
        .map(|c| SplitRoute::from_quotes(c.members.into_iter().cloned().collect()))
        .collect()
}

/// Depth-first enumeration of splits summing to exactly 100%.
///
/// `current` holds `(position in order, quote index)` pairs. Each new member
/// comes from the same bucket as the previous one (a later quote) or from a
/// smaller bucket, so every split is generated exactly once.
fn collect_splits<'a>(
    buckets: &'a [QuoteBucket],
    order: &[usize],
    max_splits: usize,
    current: &mut Vec<(usize, usize)>,
    percent: u32,
    out: &mut Vec<Candidate<'a>>,
) {
    let (start_pos, last_quote) = match current.last() {
        Some(&(pos, quote)) => (pos, Some(quote)),
        None => (0, None),
    };

    for (pos, &bucket_idx) in order.iter().enumerate().skip(start_pos) {
        let bucket = &buckets[bucket_idx];
        let total = percent + u32::from(bucket.percent);
        if total > 100 {
            continue;
        }

        let first_quote = match last_quote {
            Some(q) if pos == start_pos => q + 1,
            _ => 0,
        };

        for (quote_idx, quote) in bucket.quotes.iter().enumerate().skip(first_quote) {
            let reuses_pool = current
                .iter()
                .any(|&(p, q)| buckets[order[p]].quotes[q].shares_pool_with(quote));
            if reuses_pool {
                continue;
            }

            current.push((pos, quote_idx));
            if total == 100 {
                let members = current
                    .iter()
                    .map(|&(p, q)| &buckets[order[p]].quotes[q])
                    .collect();
                out.push(Candidate::new(members));
            } else if current.len() < max_splits {
                collect_splits(buckets, order, max_splits, current, total, out);
            }
            current.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::HopQuote;
    use splitroute_core::{PoolId, Route, TokenId};

    fn quote(percent: u8, pools: &[&str], route_index: usize, amount_out: u64) -> RouteQuote {
        let amount_in = u64::from(percent) * 10;
        RouteQuote {
            percent,
            route_index,
            route: Route::new(pools.iter().map(|p| PoolId::new(*p)).collect()),
            amount_in,
            amount_out,
            hops: pools
                .iter()
                .map(|p| HopQuote {
                    pool_id: PoolId::new(*p),
                    input_token: TokenId::new("sol"),
                    output_token: TokenId::new("usdc"),
                    amount_in,
                    amount_out,
                })
                .collect(),
        }
    }

    fn bucket(percent: u8, quotes: Vec<RouteQuote>) -> QuoteBucket {
        QuoteBucket {
            percent,
            amount: u64::from(percent) * 10,
            quotes,
        }
    }

    fn shape(split: &SplitRoute) -> Vec<(u8, usize)> {
        split.quotes.iter().map(|q| (q.percent, q.route_index)).collect()
    }

    fn two_pool_buckets() -> Vec<QuoteBucket> {
        vec![
            bucket(50, vec![quote(50, &["p1"], 0, 600), quote(50, &["p2"], 1, 590)]),
            bucket(100, vec![quote(100, &["p1"], 0, 1_000), quote(100, &["p2"], 1, 980)]),
        ]
    }

    #[test]
    fn test_even_split_across_parallel_pools() {
        let buckets = two_pool_buckets();
        let ranked = rank_split_routes(&buckets, Some(&buckets[1]), true, 2, 50);

        assert_eq!(ranked.len(), 3);
        assert_eq!(shape(&ranked[0]), vec![(50, 0), (50, 1)]);
        assert_eq!(ranked[0].amount_out, 1_190);
        assert_eq!(shape(&ranked[1]), vec![(100, 0)]);
        assert_eq!(shape(&ranked[2]), vec![(100, 1)]);
        assert!(ranked.iter().all(|r| r.percent == 100));
    }

    #[test]
    fn test_max_splits_one_disables_splitting() {
        let buckets = two_pool_buckets();
        let ranked = rank_split_routes(&buckets, Some(&buckets[1]), true, 1, 50);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.split_count() == 1));
    }

    #[test]
    fn test_pools_never_shared_within_split() {
        let buckets = vec![
            bucket(
                50,
                vec![quote(50, &["p1"], 0, 600), quote(50, &["p1", "p3"], 1, 700)],
            ),
            bucket(100, vec![]),
        ];
        let ranked = rank_split_routes(&buckets, None, true, 2, 50);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_three_way_split_and_percent_totals() {
        let buckets = vec![
            bucket(
                20,
                vec![
                    quote(20, &["p1"], 0, 250),
                    quote(20, &["p2"], 1, 240),
                    quote(20, &["p3"], 2, 230),
                ],
            ),
            bucket(
                40,
                vec![
                    quote(40, &["p1"], 0, 450),
                    quote(40, &["p2"], 1, 440),
                    quote(40, &["p3"], 2, 430),
                ],
            ),
            bucket(60, vec![quote(60, &["p1"], 0, 620), quote(60, &["p2"], 1, 610)]),
            bucket(80, vec![quote(80, &["p1"], 0, 800)]),
            bucket(100, vec![quote(100, &["p1"], 0, 950)]),
        ];
        let ranked = rank_split_routes(&buckets, Some(&buckets[4]), true, 3, 50);

        assert!(!ranked.is_empty());
        for split in &ranked {
            let total: u32 = split.quotes.iter().map(|q| u32::from(q.percent)).sum();
            assert_eq!(total, 100);
            assert!(split.split_count() <= 3);
            for pair in split.quotes.windows(2) {
                assert!(pair[0].percent >= pair[1].percent);
            }
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].amount_out >= pair[1].amount_out);
        }
        // 40 + 40 + 20 across three distinct pools beats everything else
        assert_eq!(ranked[0].amount_out, 450 + 440 + 230);
    }

    #[test]
    fn test_exact_output_ranks_by_input() {
        let mut cheap = quote(100, &["p2"], 1, 1_000);
        cheap.amount_in = 900;
        let mut pricey = quote(100, &["p1"], 0, 1_000);
        pricey.amount_in = 950;
        let buckets = vec![bucket(100, vec![cheap, pricey])];
        let ranked = rank_split_routes(&buckets, Some(&buckets[0]), false, 3, 50);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].amount_in, 900);
        assert_eq!(ranked[1].amount_in, 950);
    }

    #[test]
    fn test_pruned_single_hop_restored_from_full_bucket() {
        let full = bucket(
            100,
            vec![
                quote(100, &["p1"], 0, 900),
                quote(100, &["p2", "p3"], 1, 1_000),
            ],
        );
        // Pruning to one quote dropped the single-hop route
        let pruned = vec![bucket(100, vec![full.quotes[1].clone()])];
        let ranked = rank_split_routes(&pruned, Some(&full), true, 3, 50);

        assert_eq!(ranked.len(), 2);
        assert_eq!(shape(&ranked[0]), vec![(100, 1)]);
        assert_eq!(shape(&ranked[1]), vec![(100, 0)]);
    }

    #[test]
    fn test_top_n_is_a_prefix() {
        let buckets = vec![
            bucket(
                50,
                vec![
                    quote(50, &["p1"], 0, 600),
                    quote(50, &["p2"], 1, 590),
                    quote(50, &["p3"], 2, 580),
                ],
            ),
            bucket(
                100,
                vec![
                    quote(100, &["p1"], 0, 1_000),
                    quote(100, &["p2"], 1, 990),
                    quote(100, &["p3"], 2, 980),
                ],
            ),
        ];
        let all = rank_split_routes(&buckets, Some(&buckets[1]), true, 2, 50);
        let top = rank_split_routes(&buckets, Some(&buckets[1]), true, 2, 2);
        assert_eq!(all.len(), 6);
        assert_eq!(top[..], all[..2]);
    }
}
