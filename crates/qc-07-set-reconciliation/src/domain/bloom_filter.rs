//! Deduplicating Bloom filter
//!
//! INVARIANTS:
//! - No false negatives: once `add(key)` has run, `check(key)` returns true
//! - Bits are only ever set, never cleared

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::bytes;
use super::config::{BloomConfig, BloomSize};
use super::hash_functions::fingerprint_positions;
use crate::error::FilterError;

/// Fixed-size Bloom filter whose `add` reports collisions with prior content
///
/// A key's fingerprint is the set of bits chosen by each seed. Adding a key
/// whose fingerprint is already fully covered leaves the filter untouched and
/// returns `false`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomFilter {
    /// Filter state, bit `i` lives in byte `i / 8` at position `i % 8`
    #[serde(with = "bitvec_serde")]
    fingerprint: BitVec<u8, Lsb0>,
    /// One hash function per seed
    seeds: Vec<u32>,
}

/// Serde support for BitVec
mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u8, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bits.as_raw_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BitVec<u8, Lsb0>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        Ok(BitVec::<u8, Lsb0>::from_vec(bytes))
    }
}

impl BloomFilter {
    /// Create an empty filter from a validated configuration
    pub fn new(config: &BloomConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            fingerprint: bitvec![u8, Lsb0; 0; config.size_bytes * 8],
            seeds: config.seeds.clone(),
        })
    }

    /// Create an empty filter using one of the size presets
    pub fn with_preset(size: BloomSize, seeds: Vec<u32>) -> Result<Self, FilterError> {
        Self::new(&BloomConfig::with_preset(size, seeds)?)
    }

    /// Add a key. Returns `false` if every bit of its fingerprint was already
    /// set, in which case the filter is not modified.
    pub fn add(&mut self, key: &[u8]) -> bool {
        let key_fingerprint = self.key_fingerprint(key);
        if self.covers(&key_fingerprint) {
            return false;
        }

        let merged = bytes::or(self.fingerprint.as_raw_slice(), key_fingerprint.as_raw_slice());
        self.fingerprint.as_raw_mut_slice().copy_from_slice(&merged);
        true
    }

    /// Test whether a key might be in the filter
    ///
    /// Returns:
    /// - `true` if the key might have been added (could be false positive)
    /// - `false` if the key was definitely never added
    pub fn check(&self, key: &[u8]) -> bool {
        self.covers(&self.key_fingerprint(key))
    }

    /// Fresh, zeroed filter with the same size and seeds
    pub fn clone_empty(&self) -> Self {
        Self {
            fingerprint: bitvec![u8, Lsb0; 0; self.fingerprint.len()],
            seeds: self.seeds.clone(),
        }
    }

    fn covers(&self, key_fingerprint: &BitVec<u8, Lsb0>) -> bool {
        let raw = key_fingerprint.as_raw_slice();
        bytes::eq(&bytes::and(self.fingerprint.as_raw_slice(), raw), raw)
    }

    fn key_fingerprint(&self, key: &[u8]) -> BitVec<u8, Lsb0> {
        let mut result = bitvec![u8, Lsb0; 0; self.fingerprint.len()];
        for pos in fingerprint_positions(key, &self.seeds, self.fingerprint.len()) {
            result.set(pos, true);
        }
        result
    }

    /// Get the filter size in bytes
    pub fn size_bytes(&self) -> usize {
        self.fingerprint.len() / 8
    }

    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.fingerprint.count_ones()
    }

    /// Raw fingerprint bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.fingerprint.as_raw_slice()
    }

    /// Serialize the filter to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, FilterError> {
        bincode::serialize(self).map_err(|e| FilterError::SerializationError(e.to_string()))
    }

    /// Deserialize a filter from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        let filter: Self = bincode::deserialize(bytes)
            .map_err(|e| FilterError::SerializationError(e.to_string()))?;
        BloomConfig::new(filter.size_bytes(), filter.seeds.clone())
            .map_err(|e| FilterError::SerializationError(e.to_string()))?;
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_filter() -> BloomFilter {
        BloomFilter::new(&BloomConfig::new(32, vec![0, 1, 2]).unwrap()).unwrap()
    }

    #[test]
    fn test_new_filter_is_empty() {
        let filter = BloomFilter::with_preset(BloomSize::Bytes512, vec![0, 1, 2, 3, 4]).unwrap();

        assert_eq!(filter.size_bytes(), 512, "incorrect fingerprint length");
        assert_eq!(filter.seeds().len(), 5, "incorrect number of hash seeds");
        assert_eq!(filter.bits_set(), 0, "All bits should be zero initially");
    }

    #[test]
    fn test_add_reports_collision_on_repeat() {
        let mut filter = small_filter();
        let d1 = [0x11u8; 32];
        let d2 = [0x22u8; 32];

        assert!(filter.add(&d1), "failed to add first data point");
        assert!(filter.add(&d2), "failed to add second data point");
        assert!(
            !filter.add(&d2),
            "adding data point for the second time should fail"
        );
    }

    #[test]
    fn test_collision_leaves_filter_unchanged() {
        let mut filter = small_filter();
        filter.add(b"first");
        let before = filter.clone();

        assert!(!filter.add(b"first"));
        assert_eq!(filter, before, "A rejected add must not modify the filter");
    }

    #[test]
    fn test_add_sets_at_most_k_bits() {
        let mut filter = small_filter();
        filter.add(b"element");

        assert!(filter.bits_set() >= 1);
        assert!(filter.bits_set() <= 3, "At most one bit per seed");
    }

    #[test]
    fn test_check_after_add() {
        let mut filter = small_filter();
        let d1 = [0x33u8; 32];
        let d2 = [0x44u8; 32];

        assert!(filter.add(&d1), "Failed to add data to an empty filter");
        assert!(filter.check(&d1), "failed to identify only datapoint in filter");
        assert!(!filter.check(&d2), "identified datapoint not in filter");
    }

    #[test]
    fn test_no_false_negatives_bulk() {
        let mut filter =
            BloomFilter::with_preset(BloomSize::Bytes1024, vec![0, 1, 2, 3, 4]).unwrap();
        let keys: Vec<String> = (0..500).map(|i| format!("tx_{:04x}", i)).collect();

        for key in &keys {
            filter.add(key.as_bytes());
        }
        for key in &keys {
            assert!(filter.check(key.as_bytes()), "False negative for {}", key);
        }
    }

    #[test]
    fn test_variable_length_keys() {
        let mut filter = small_filter();
        assert!(filter.add(b"a"));
        assert!(filter.add(&[7u8; 300]));
        assert!(filter.check(b"a"));
        assert!(filter.check(&[7u8; 300]));
    }

    #[test]
    fn test_clone_empty_is_zeroed_and_independent() {
        let mut filter = small_filter();
        filter.add(b"content");

        let mut fresh = filter.clone_empty();
        assert_eq!(fresh.bits_set(), 0, "clone_empty must not copy content");
        assert_eq!(fresh.size_bytes(), filter.size_bytes());
        assert_eq!(fresh.seeds(), filter.seeds());

        let bits_before = filter.bits_set();
        fresh.add(b"other");
        assert_eq!(
            filter.bits_set(),
            bits_before,
            "Adding to a clone must not touch the original"
        );
    }

    #[test]
    fn test_bit_layout_is_lsb_first() {
        let mut filter = BloomFilter::new(&BloomConfig::new(4, vec![5]).unwrap()).unwrap();
        let pos = fingerprint_positions(b"layout", &[5], 32)[0];
        filter.add(b"layout");

        assert_eq!(filter.as_bytes()[pos / 8], 1u8 << (pos % 8));
    }

    #[test]
    fn test_serialization() {
        let mut filter = small_filter();
        filter.add(b"element_1");
        filter.add(b"element_2");

        let bytes = filter.to_bytes().expect("Serialization should succeed");
        let restored = BloomFilter::from_bytes(&bytes).expect("Deserialization should succeed");

        assert_eq!(restored, filter);
        assert!(restored.check(b"element_1"));
        assert!(restored.check(b"element_2"));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            BloomFilter::from_bytes(&[1, 2, 3]),
            Err(FilterError::SerializationError(_))
        ));
    }
}
