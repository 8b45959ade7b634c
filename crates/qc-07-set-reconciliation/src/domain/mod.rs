//! Domain Layer - Pure data structures
//!
//! This layer contains:
//! - Byte buffer operators
//! - Seeded hash family
//! - Deduplicating Bloom filter
//! - Invertible Bloom filter and its buckets
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Seeds come from configuration, never generated here

pub mod bloom_filter;
pub mod bucket;
pub mod bytes;
pub mod config;
pub mod hash_functions;
pub mod invertible_filter;

pub use bloom_filter::BloomFilter;
pub use bucket::Bucket;
pub use config::{BloomConfig, BloomSize, IbfConfig, IbfConfigBuilder, DEFAULT_KEY_LENGTH};
pub use invertible_filter::{Decoded, InvertibleBloomFilter};
