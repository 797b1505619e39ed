//! Keyed sum/count/mean aggregation
//!
//! Group-by-key over `(key, value)` pairs. Partial accumulators built over
//! disjoint partitions merge into the same totals the sequential fold
//! produces, so the partitioned path can fan out without coordination.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Aggregation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Partition count must be at least 1")]
    ZeroPartitions,
}

/// Running sum and count for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingAccumulator {
    pub sum: f64,
    pub count: u64,
}

impl RatingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Fold another partial accumulator into this one
    pub fn merge(&mut self, other: &RatingAccumulator) {
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Mean of the pushed values, `None` when nothing was pushed
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Final per-key aggregate. `count` is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedAggregate<K> {
    pub key: K,
    pub sum: f64,
    pub count: u64,
    pub mean: f64,
}

fn accumulate<'a, K, I>(pairs: I) -> HashMap<K, RatingAccumulator>
where
    K: Hash + Eq + Clone + 'a,
    I: IntoIterator<Item = &'a (K, f64)>,
{
    let mut groups: HashMap<K, RatingAccumulator> = HashMap::new();
    for (key, value) in pairs {
        groups.entry(key.clone()).or_default().push(*value);
    }
    groups
}

fn merge_groups<K: Hash + Eq>(
    mut into: HashMap<K, RatingAccumulator>,
    from: HashMap<K, RatingAccumulator>,
) -> HashMap<K, RatingAccumulator> {
    for (key, partial) in from {
        into.entry(key).or_default().merge(&partial);
    }
    into
}

fn finalize<K: Ord>(groups: HashMap<K, RatingAccumulator>) -> Vec<KeyedAggregate<K>> {
    let mut out: Vec<KeyedAggregate<K>> = groups
        .into_iter()
        .filter_map(|(key, acc)| {
            acc.mean().map(|mean| KeyedAggregate {
                key,
                sum: acc.sum,
                count: acc.count,
                mean,
            })
        })
        .collect();
    out.sort_by(|a, b| a.key.cmp(&b.key));
    out
}

/// Group `(key, value)` pairs by key, ordered by key ascending
pub fn aggregate_by_key<K>(pairs: &[(K, f64)]) -> Vec<KeyedAggregate<K>>
where
    K: Hash + Eq + Ord + Clone,
{
    finalize(accumulate(pairs))
}

/// Same as [`aggregate_by_key`] but folds `partitions` contiguous chunks
/// separately and merges the partial accumulators afterwards.
pub fn aggregate_partitioned<K>(
    pairs: &[(K, f64)],
    partitions: usize,
) -> Result<Vec<KeyedAggregate<K>>, AggregateError>
where
    K: Hash + Eq + Ord + Clone + Send + Sync,
{
    if partitions == 0 {
        return Err(AggregateError::ZeroPartitions);
    }

    let chunk_size = pairs.len().div_ceil(partitions).max(1);

    #[cfg(feature = "parallel")]
    let groups = pairs
        .par_chunks(chunk_size)
        .map(accumulate)
        .reduce(HashMap::new, merge_groups);

    #[cfg(not(feature = "parallel"))]
    let groups = pairs
        .chunks(chunk_size)
        .map(accumulate)
        .fold(HashMap::new(), merge_groups);

    Ok(finalize(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accumulator_mean() {
        let mut acc = RatingAccumulator::new();
        assert_eq!(acc.mean(), None);

        acc.push(5.0);
        acc.push(4.0);
        acc.push(3.0);
        assert_eq!(acc.count, 3);
        assert!((acc.mean().unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_merge() {
        let mut left = RatingAccumulator::new();
        left.push(1.0);
        let mut right = RatingAccumulator::new();
        right.push(2.0);
        right.push(3.0);

        left.merge(&right);
        assert_eq!(left.count, 3);
        assert_eq!(left.sum, 6.0);
    }

    #[test]
    fn test_aggregate_by_key() {
        let pairs = vec![(10, 5.0), (20, 2.0), (10, 4.0), (10, 3.0)];
        let out = aggregate_by_key(&pairs);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key, 10);
        assert_eq!(out[0].count, 3);
        assert_eq!(out[0].sum, 12.0);
        assert!((out[0].mean - 4.0).abs() < 1e-12);
        assert_eq!(out[1].key, 20);
        assert_eq!(out[1].count, 1);
    }

    #[test]
    fn test_aggregate_empty() {
        let pairs: Vec<(i64, f64)> = Vec::new();
        assert!(aggregate_by_key(&pairs).is_empty());
        assert!(aggregate_partitioned(&pairs, 4).unwrap().is_empty());
    }

    #[test]
    fn test_zero_partitions_rejected() {
        let pairs = vec![(1, 1.0)];
        assert_eq!(
            aggregate_partitioned(&pairs, 0),
            Err(AggregateError::ZeroPartitions)
        );
    }

    proptest! {
        #[test]
        fn prop_partitioned_matches_sequential(
            pairs in prop::collection::vec((0i64..20, 0u8..=10), 0..200),
            partitions in 1usize..9,
        ) {
            let pairs: Vec<(i64, f64)> = pairs
                .into_iter()
                .map(|(k, half_stars)| (k, half_stars as f64 / 2.0))
                .collect();

            let sequential = aggregate_by_key(&pairs);
            let partitioned = aggregate_partitioned(&pairs, partitions).unwrap();

            prop_assert_eq!(sequential.len(), partitioned.len());
            for (a, b) in sequential.iter().zip(partitioned.iter()) {
                prop_assert_eq!(a.key, b.key);
                prop_assert_eq!(a.count, b.count);
                prop_assert!((a.mean - b.mean).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_mean_is_sum_over_count(
            values in prop::collection::vec(0u8..=10, 1..50),
        ) {
            let pairs: Vec<(i64, f64)> = values
                .iter()
                .map(|&v| (1, v as f64 / 2.0))
                .collect();
            let expected: f64 = pairs.iter().map(|(_, v)| v).sum::<f64>() / pairs.len() as f64;

            let out = aggregate_by_key(&pairs);
            prop_assert_eq!(out.len(), 1);
            prop_assert_eq!(out[0].count, values.len() as u64);
            prop_assert!((out[0].mean - expected).abs() < 1e-9);
        }
    }
}
