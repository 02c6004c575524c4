//! Top-K selection of buckets by population.
//!
//! A max-heap keyed on bucket weight. Equal weights pop in the order they
//! were pushed, which keeps the ranking deterministic for a given push order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::classify::BucketKey;
use crate::store::{BucketEntry, BucketStore};

/// A bucket ready to be ranked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub key: BucketKey,
    pub entry: BucketEntry,
}

#[derive(Debug)]
struct HeapItem {
    weight: u64,
    order: Reverse<u64>,
    ranked: Ranked,
}

impl HeapItem {
    fn priority(&self) -> (u64, Reverse<u64>) {
        (self.weight, self.order)
    }
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

/// Max-priority queue of buckets ordered by weight.
#[derive(Debug, Default)]
pub struct TopKSelector {
    heap: BinaryHeap<HeapItem>,
    pushed: u64,
}

impl TopKSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue holding every populated bucket of `store`, pushed in index
    /// order.
    pub fn from_store(store: &BucketStore) -> Self {
        let mut selector = Self {
            heap: BinaryHeap::with_capacity(store.len()),
            pushed: 0,
        };
        for (key, entry) in store.iter() {
            selector.push(Ranked { key, entry: *entry });
        }
        selector
    }

    pub fn push(&mut self, ranked: Ranked) {
        self.heap.push(HeapItem {
            weight: ranked.entry.weight,
            order: Reverse(self.pushed),
            ranked,
        });
        self.pushed += 1;
    }

    /// Remove and return the heaviest bucket.
    pub fn pop_max(&mut self) -> Option<Ranked> {
        self.heap.pop().map(|item| item.ranked)
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pop up to `k` buckets, heaviest first. Stops early once the queue
    /// runs dry.
    pub fn take_top(&mut self, k: usize) -> Vec<Ranked> {
        let mut top = Vec::with_capacity(k.min(self.size()));
        while top.len() < k {
            match self.pop_max() {
                Some(ranked) => top.push(ranked),
                None => break,
            }
        }
        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Hsl;

    fn ranked(slice: u8, weight: u64) -> Ranked {
        Ranked {
            key: BucketKey::black(slice).unwrap(),
            entry: BucketEntry {
                average: Hsl::default(),
                weight,
            },
        }
    }

    #[test]
    fn test_pops_in_descending_weight() {
        let mut selector = TopKSelector::new();
        for (slice, weight) in [(0, 3), (1, 9), (2, 1), (3, 7), (4, 5)] {
            selector.push(ranked(slice, weight));
        }
        assert_eq!(selector.size(), 5);

        let weights: Vec<u64> = std::iter::from_fn(|| selector.pop_max())
            .map(|r| r.entry.weight)
            .collect();
        assert_eq!(weights, vec![9, 7, 5, 3, 1]);
        assert!(selector.is_empty());
        assert!(selector.pop_max().is_none());
    }

    #[test]
    fn test_ties_pop_in_push_order() {
        let mut selector = TopKSelector::new();
        selector.push(ranked(3, 4));
        selector.push(ranked(1, 4));
        selector.push(ranked(0, 6));
        selector.push(ranked(2, 4));

        let keys: Vec<BucketKey> = selector.take_top(4).into_iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                BucketKey::black(0).unwrap(),
                BucketKey::black(3).unwrap(),
                BucketKey::black(1).unwrap(),
                BucketKey::black(2).unwrap()
            ]
        );
    }

    #[test]
    fn test_take_top_stops_when_empty() {
        let mut selector = TopKSelector::new();
        selector.push(ranked(0, 2));
        selector.push(ranked(1, 8));

        let top = selector.take_top(10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].entry.weight, 8);
        assert!(selector.take_top(10).is_empty());
    }

    #[test]
    fn test_take_top_limits_to_k() {
        let mut selector = TopKSelector::new();
        for slice in 0..5 {
            selector.push(ranked(slice, u64::from(slice) + 1));
        }
        let top = selector.take_top(2);
        assert_eq!(top.len(), 2);
        assert_eq!(selector.size(), 3);
        assert!(selector.take_top(0).is_empty());
    }

    #[test]
    fn test_from_store_breaks_ties_by_bucket_index() {
        let mut store = BucketStore::new();
        let color = BucketKey::color(0, 5).unwrap();
        let white = BucketKey::white(0).unwrap();
        store.accumulate(color, Hsl::new(0.0, 1.0, 0.5));
        store.accumulate(white, Hsl::new(0.0, 0.0, 1.0));

        let mut selector = TopKSelector::from_store(&store);
        assert_eq!(selector.pop_max().map(|r| r.key), Some(white));
        assert_eq!(selector.pop_max().map(|r| r.key), Some(color));
    }
}
