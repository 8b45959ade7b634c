//! Filter configuration and validation
//!
//! Seeds are supplied by whoever distributes them between peers. Builders
//! refuse to fill them in on the caller's behalf.
//!
//! # Example
//!
//! ```ignore
//! use qc_07_set_reconciliation::domain::IbfConfigBuilder;
//!
//! let config = IbfConfigBuilder::new()
//!     .num_buckets(256)
//!     .index_seeds(vec![11, 22, 33, 44])
//!     .key_seed(99)
//!     .build()?;
//! ```

use crate::error::FilterError;
use serde::{Deserialize, Serialize};

/// Byte length of transaction ids (256-bit hashes)
pub const DEFAULT_KEY_LENGTH: usize = 32;

/// Fingerprint size presets for the deduplicating Bloom filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloomSize {
    Bytes256,
    /// Enough for ~656 entries at an FPR around 0.001 with 5 seeds
    Bytes512,
    Bytes1024,
}

impl BloomSize {
    pub fn bytes(self) -> usize {
        match self {
            BloomSize::Bytes256 => 256,
            BloomSize::Bytes512 => 512,
            BloomSize::Bytes1024 => 1024,
        }
    }
}

/// Bloom filter configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Fingerprint size in bytes
    pub size_bytes: usize,
    /// One hash function per seed
    pub seeds: Vec<u32>,
}

impl BloomConfig {
    /// Create a new configuration with validation
    pub fn new(size_bytes: usize, seeds: Vec<u32>) -> Result<Self, FilterError> {
        let config = Self { size_bytes, seeds };
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration from a size preset
    pub fn with_preset(size: BloomSize, seeds: Vec<u32>) -> Result<Self, FilterError> {
        Self::new(size.bytes(), seeds)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.size_bytes == 0 {
            return Err(FilterError::InvalidParameters(
                "size_bytes cannot be 0".to_string(),
            ));
        }
        if self.seeds.is_empty() {
            return Err(FilterError::InvalidParameters(
                "at least one hash seed is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Invertible Bloom filter configuration
///
/// Two filters can be subtracted only if every field matches, with
/// `index_seeds` compared as a set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbfConfig {
    /// Number of buckets
    pub num_buckets: usize,
    /// Seeds selecting which buckets a key touches
    pub index_seeds: Vec<u32>,
    /// Seed for the per-key digest stored in `hash_sum`
    pub key_seed: u32,
    /// Byte length every key must have
    #[serde(default = "default_key_length")]
    pub key_length: usize,
}

fn default_key_length() -> usize {
    DEFAULT_KEY_LENGTH
}

impl IbfConfig {
    /// Create a new configuration with validation
    pub fn new(
        num_buckets: usize,
        index_seeds: Vec<u32>,
        key_seed: u32,
        key_length: usize,
    ) -> Result<Self, FilterError> {
        let config = Self {
            num_buckets,
            index_seeds,
            key_seed,
            key_length,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.num_buckets == 0 {
            return Err(FilterError::InvalidParameters(
                "num_buckets cannot be 0".to_string(),
            ));
        }
        if self.index_seeds.is_empty() {
            return Err(FilterError::InvalidParameters(
                "at least one index seed is required".to_string(),
            ));
        }
        if self.key_length == 0 {
            return Err(FilterError::InvalidParameters(
                "key_length cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Same parameters with a different bucket count.
    ///
    /// Used when a reconciliation is retried with a larger filter.
    pub fn with_num_buckets(mut self, num_buckets: usize) -> Self {
        self.num_buckets = num_buckets;
        self
    }
}

/// Builder for IbfConfig with validation
#[derive(Default)]
pub struct IbfConfigBuilder {
    num_buckets: Option<usize>,
    index_seeds: Option<Vec<u32>>,
    key_seed: Option<u32>,
    key_length: Option<usize>,
}

impl IbfConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_buckets(mut self, num_buckets: usize) -> Self {
        self.num_buckets = Some(num_buckets);
        self
    }

    pub fn index_seeds(mut self, seeds: Vec<u32>) -> Self {
        self.index_seeds = Some(seeds);
        self
    }

    pub fn key_seed(mut self, seed: u32) -> Self {
        self.key_seed = Some(seed);
        self
    }

    /// Defaults to [`DEFAULT_KEY_LENGTH`]
    pub fn key_length(mut self, length: usize) -> Self {
        self.key_length = Some(length);
        self
    }

    /// Build the IbfConfig, validating all parameters
    ///
    /// Bucket count and both seed inputs have no defaults.
    pub fn build(self) -> Result<IbfConfig, FilterError> {
        let num_buckets = self
            .num_buckets
            .ok_or_else(|| FilterError::InvalidParameters("num_buckets is required".to_string()))?;
        let index_seeds = self
            .index_seeds
            .ok_or_else(|| FilterError::InvalidParameters("index_seeds are required".to_string()))?;
        let key_seed = self
            .key_seed
            .ok_or_else(|| FilterError::InvalidParameters("key_seed is required".to_string()))?;

        IbfConfig::new(
            num_buckets,
            index_seeds,
            key_seed,
            self.key_length.unwrap_or(DEFAULT_KEY_LENGTH),
        )
    }
}
