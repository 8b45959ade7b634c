//! Invertible Bloom filter
//!
//! Each peer builds a filter over its own key set with identical parameters.
//! One side subtracts the other's filter from its own and decodes the result
//! to learn the symmetric difference, without either set being sent.
//!
//! INVARIANTS:
//! - Insert and delete of the same key touch the same deduplicated bucket set
//! - Two filters are compatible iff bucket count, key seed, key length and the
//!   index seed set are equal
//! - Decoding consumes the filter

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::bucket::Bucket;
use super::config::IbfConfig;
use super::hash_functions::{bucket_indices, murmur_hash};
use crate::error::{ConfigMismatch, FilterError};

/// Result of peeling a subtracted filter `A - B`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Keys in `A` but not in `B`
    pub remaining: Vec<Vec<u8>>,
    /// Keys in `B` but not in `A`
    pub missing: Vec<Vec<u8>>,
    /// Number of scans over the bucket array, including the final empty one
    pub passes: usize,
}

impl Decoded {
    /// Total number of recovered keys
    pub fn len(&self) -> usize {
        self.remaining.len() + self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty() && self.missing.is_empty()
    }
}

/// Counting filter with XOR-accumulated key and digest sums
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertibleBloomFilter {
    buckets: Vec<Bucket>,
    /// Order matters for index derivation, not for compatibility
    index_seeds: Vec<u32>,
    key_seed: u32,
    key_length: usize,
}

impl InvertibleBloomFilter {
    /// Create an empty filter from a validated configuration
    pub fn new(config: &IbfConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            buckets: vec![Bucket::new(config.key_length); config.num_buckets],
            index_seeds: config.index_seeds.clone(),
            key_seed: config.key_seed,
            key_length: config.key_length,
        })
    }

    /// Insert a key.
    ///
    /// Returns `false` when every touched bucket already held two or more
    /// entries, a hint that the key may collide with earlier content. The
    /// hint means nothing once anything has been deleted or subtracted.
    ///
    /// # Panics
    /// Panics if `key.len()` differs from the configured key length.
    pub fn add(&mut self, key: &[u8]) -> bool {
        self.check_key(key);
        let hash = self.hash_key(key);
        let indices = self.hash_indices(key);
        for &idx in &indices {
            self.buckets[idx].add(key, hash);
        }

        indices.iter().any(|&idx| self.buckets[idx].count() < 2)
    }

    /// Remove a key. No membership check is made; deleting a key that was
    /// never inserted drives counts negative.
    ///
    /// # Panics
    /// Panics if `key.len()` differs from the configured key length.
    pub fn delete(&mut self, key: &[u8]) {
        self.check_key(key);
        let hash = self.hash_key(key);
        for idx in self.hash_indices(key) {
            self.buckets[idx].delete(key, hash);
        }
    }

    /// Subtract `other` from this filter bucket by bucket.
    ///
    /// Fails without touching `self` if the filters are not compatible.
    pub fn subtract(&mut self, other: &InvertibleBloomFilter) -> Result<(), FilterError> {
        if let Err(mismatch) = self.validate_subtrahend(other) {
            warn!(%mismatch, "Rejected IBF subtraction");
            return Err(mismatch.into());
        }

        for (bucket, other_bucket) in self.buckets.iter_mut().zip(&other.buckets) {
            bucket.subtract(other_bucket);
        }
        debug!(num_buckets = self.buckets.len(), "IBF subtracted");
        Ok(())
    }

    /// Check that `other` was built with the same parameters as `self`
    pub fn validate_subtrahend(&self, other: &InvertibleBloomFilter) -> Result<(), ConfigMismatch> {
        if self.buckets.len() != other.buckets.len() {
            return Err(ConfigMismatch::BucketCount {
                expected: self.buckets.len(),
                got: other.buckets.len(),
            });
        }
        if self.key_seed != other.key_seed {
            return Err(ConfigMismatch::KeySeed {
                expected: self.key_seed,
                got: other.key_seed,
            });
        }
        if self.key_length != other.key_length {
            return Err(ConfigMismatch::KeyLength {
                expected: self.key_length,
                got: other.key_length,
            });
        }

        let mut expected = self.index_seeds.clone();
        let mut got = other.index_seeds.clone();
        expected.sort_unstable();
        got.sort_unstable();
        if expected != got {
            return Err(ConfigMismatch::IndexSeeds { expected, got });
        }
        Ok(())
    }

    /// Peel pure buckets until none are left.
    ///
    /// A pure bucket with count `1` yields a remaining key and the key is
    /// deleted; count `-1` yields a missing key and the key is re-added.
    /// Either may expose further pure buckets. Succeeds only if every bucket
    /// ends up empty, otherwise returns `DecodeIncomplete` with what was
    /// recovered so far.
    pub fn decode(mut self) -> Result<Decoded, FilterError> {
        let mut decoded = Decoded::default();

        loop {
            decoded.passes += 1;
            let mut updated = false;

            for idx in 0..self.buckets.len() {
                let Some((count, key)) = self.pure_entry(idx) else {
                    continue;
                };
                if count == 1 {
                    self.delete(&key);
                    decoded.remaining.push(key);
                } else {
                    self.add(&key);
                    decoded.missing.push(key);
                }
                updated = true;
            }

            debug!(
                pass = decoded.passes,
                remaining = decoded.remaining.len(),
                missing = decoded.missing.len(),
                "IBF decode pass"
            );

            if !updated {
                break;
            }
        }

        let unresolved = self.buckets.iter().filter(|b| !b.is_empty()).count();
        if unresolved > 0 {
            warn!(
                unresolved,
                num_buckets = self.buckets.len(),
                recovered = decoded.len(),
                "IBF decode incomplete"
            );
            return Err(FilterError::DecodeIncomplete {
                unresolved,
                partial: decoded,
            });
        }
        Ok(decoded)
    }

    /// Fresh, zeroed filter with the same parameters
    pub fn clone_empty(&self) -> Self {
        Self {
            buckets: vec![Bucket::new(self.key_length); self.buckets.len()],
            index_seeds: self.index_seeds.clone(),
            key_seed: self.key_seed,
            key_length: self.key_length,
        }
    }

    /// A bucket only counts as pure if its key actually maps to it. Peeling
    /// a key from a bucket it does not map to would never clear that bucket.
    fn pure_entry(&self, idx: usize) -> Option<(i64, Vec<u8>)> {
        let bucket = &self.buckets[idx];
        if !bucket.is_pure(|key| self.hash_key(key)) {
            return None;
        }

        let key = bucket.key_sum();
        if !self.hash_indices(key).contains(&idx) {
            return None;
        }
        Some((bucket.count(), key.to_vec()))
    }

    fn hash_key(&self, key: &[u8]) -> u32 {
        murmur_hash(key, self.key_seed)
    }

    fn hash_indices(&self, key: &[u8]) -> Vec<usize> {
        bucket_indices(key, &self.index_seeds, self.buckets.len())
    }

    fn check_key(&self, key: &[u8]) {
        assert_eq!(
            key.len(),
            self.key_length,
            "IBF keys must be exactly key_length bytes"
        );
    }

    /// Parameters this filter was built with
    pub fn config(&self) -> IbfConfig {
        IbfConfig {
            num_buckets: self.buckets.len(),
            index_seeds: self.index_seeds.clone(),
            key_seed: self.key_seed,
            key_length: self.key_length,
        }
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn index_seeds(&self) -> &[u32] {
        &self.index_seeds
    }

    pub fn key_seed(&self) -> u32 {
        self.key_seed
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// True if every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Bucket::is_empty)
    }

    /// Serialize the bucket array and parameters to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, FilterError> {
        bincode::serialize(self).map_err(|e| FilterError::SerializationError(e.to_string()))
    }

    /// Deserialize a filter, rejecting inconsistent parameters
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        let filter: Self = bincode::deserialize(bytes)
            .map_err(|e| FilterError::SerializationError(e.to_string()))?;

        filter
            .config()
            .validate()
            .map_err(|e| FilterError::SerializationError(e.to_string()))?;
        if filter
            .buckets
            .iter()
            .any(|b| b.key_sum().len() != filter.key_length)
        {
            return Err(FilterError::SerializationError(
                "bucket key_sum length does not match key_length".to_string(),
            ));
        }
        Ok(filter)
    }
}
