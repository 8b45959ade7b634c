//! # QC-07 Set Reconciliation
//!
//! Probabilistic set structures for transaction gossip: a deduplicating
//! Bloom filter and an Invertible Bloom Filter (IBF) for two-party set
//! reconciliation.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure data structures, no I/O
//!   - `bytes`: AND/OR/XOR/EQ over equal-length byte buffers
//!   - `hash_functions`: Seeded MurmurHash3 family
//!   - `BloomFilter`: Fixed-size filter whose `add` reports collisions
//!   - `InvertibleBloomFilter` / `Bucket`: Insert, delete, subtract, decode
//!   - `IbfConfig` / `BloomConfig`: Validated parameters
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `SetFilter`: Capability shared by both filter kinds
//!   - `ReconciliationApi`: Driving port
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `Reconciler`: Implements `ReconciliationApi`
//!
//! ## Reconciliation flow
//!
//! Both peers agree on an `IbfConfig` (bucket count, index seeds, key seed,
//! key length). Seed choice and distribution belong to the protocol layer.
//! Each peer builds a filter over its own keys; one side subtracts the
//! other's filter and decodes the difference:
//!
//! - `remaining`: keys only the local side holds
//! - `missing`: keys only the remote side holds
//!
//! ## Invariants
//!
//! - **Bloom**: No false negatives - after `add(k)`, `check(k)` MUST return true
//! - **IBF**: `delete(k)` after `add(k)` restores every touched bucket
//! - **IBF**: `subtract` only between filters with identical parameters
//! - **IBF**: `decode` consumes the filter
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_07_set_reconciliation::{IbfConfigBuilder, InvertibleBloomFilter};
//!
//! let config = IbfConfigBuilder::new()
//!     .num_buckets(256)
//!     .index_seeds(vec![11, 22, 33, 44])
//!     .key_seed(99)
//!     .build()?;
//!
//! let mut ours = InvertibleBloomFilter::new(&config)?;
//! let theirs: InvertibleBloomFilter = receive_from_peer();
//!
//! ours.subtract(&theirs)?;
//! let decoded = ours.decode()?;
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    BloomConfig, BloomFilter, BloomSize, Bucket, Decoded, IbfConfig, IbfConfigBuilder,
    InvertibleBloomFilter, DEFAULT_KEY_LENGTH,
};
pub use error::{ConfigMismatch, FilterError};
pub use metrics::{MetricsRecorder, MetricsSnapshot, NoOpMetrics, ReconcileMetrics};
pub use ports::{ReconciliationApi, SetFilter};
pub use service::Reconciler;
