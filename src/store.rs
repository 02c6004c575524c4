//! Per-bucket running averages.
//!
//! The grid is small and fixed, so the store is a dense array indexed by
//! [`BucketKey::index`] rather than a hash map.

use serde::{Deserialize, Serialize};

use crate::classify::BucketKey;
use crate::constants::BUCKET_COUNT;
use crate::convert::Hsl;

/// Averaged color of a bucket and the number of samples folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub average: Hsl,
    pub weight: u64,
}

impl BucketEntry {
    /// A bucket holding a single sample.
    pub fn new(sample: Hsl) -> Self {
        Self {
            average: sample,
            weight: 1,
        }
    }

    /// Fold one more sample into the running mean.
    ///
    /// The mean is weighted with the weight *before* this sample is counted:
    /// `avg' = (sample + w * avg) / (w + 1)`, then `w' = w + 1`.
    #[must_use]
    pub fn fold(self, sample: Hsl) -> Self {
        let w = self.weight as f64;
        let next = w + 1.0;
        let mix = |old: f64, new: f64| (new + w * old) / next;

        Self {
            average: Hsl::new(
                mix(self.average.h, sample.h),
                mix(self.average.s, sample.s),
                mix(self.average.l, sample.l),
            ),
            weight: self.weight + 1,
        }
    }

    /// Combine two entries of the same bucket as if all their samples had
    /// been folded into one.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let a = self.weight as f64;
        let b = other.weight as f64;
        let total = a + b;
        let mix = |x: f64, y: f64| (a * x + b * y) / total;

        Self {
            average: Hsl::new(
                mix(self.average.h, other.average.h),
                mix(self.average.s, other.average.s),
                mix(self.average.l, other.average.l),
            ),
            weight: self.weight + other.weight,
        }
    }
}

/// Accumulated buckets of one extraction run.
#[derive(Debug, Clone)]
pub struct BucketStore {
    buckets: Vec<Option<BucketEntry>>,
    populated: usize,
}

impl Default for BucketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketStore {
    pub fn new() -> Self {
        Self {
            buckets: vec![None; BUCKET_COUNT],
            populated: 0,
        }
    }

    pub fn has_bucket(&self, key: BucketKey) -> bool {
        self.bucket(key).is_some()
    }

    pub fn bucket(&self, key: BucketKey) -> Option<&BucketEntry> {
        self.buckets.get(key.index()).and_then(Option::as_ref)
    }

    /// Entry for a bucket known to be populated.
    ///
    /// # Panics
    ///
    /// Panics if nothing was accumulated under `key`. `accumulate` always
    /// inserts, so this only happens on a caller bug.
    pub fn get_bucket(&self, key: BucketKey) -> &BucketEntry {
        self.bucket(key)
            .unwrap_or_else(|| panic!("bucket {key} read before anything was accumulated into it"))
    }

    /// Add one sample to the bucket under `key`, creating it if needed.
    pub fn accumulate(&mut self, key: BucketKey, sample: Hsl) {
        let slot = &mut self.buckets[key.index()];
        *slot = Some(match slot.take() {
            Some(entry) => entry.fold(sample),
            None => {
                self.populated += 1;
                BucketEntry::new(sample)
            }
        });
    }

    /// Merge another store into this one, bucket by bucket.
    pub fn merge(&mut self, other: BucketStore) {
        for (slot, incoming) in self.buckets.iter_mut().zip(other.buckets) {
            let Some(incoming) = incoming else { continue };
            *slot = Some(match slot.take() {
                Some(entry) => entry.combine(incoming),
                None => {
                    self.populated += 1;
                    incoming
                }
            });
        }
    }

    /// Populated buckets in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (BucketKey, &BucketEntry)> + '_ {
        self.buckets.iter().enumerate().filter_map(|(index, slot)| {
            let entry = slot.as_ref()?;
            Some((BucketKey::from_index(index)?, entry))
        })
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(BucketKey, &BucketEntry),
    {
        for (key, entry) in self.iter() {
            f(key, entry);
        }
    }

    /// Number of populated buckets.
    pub fn len(&self) -> usize {
        self.populated
    }

    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Sum of all bucket weights.
    pub fn total_weight(&self) -> u64 {
        self.iter().map(|(_, entry)| entry.weight).sum()
    }
}
