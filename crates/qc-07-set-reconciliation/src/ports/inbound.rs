//! Inbound Ports (Driving Ports)
//!
//! These traits define the API that external components use to interact
//! with the set reconciliation subsystem.

use crate::domain::{BloomFilter, Decoded, InvertibleBloomFilter};
use crate::error::FilterError;

/// Capability shared by both filter kinds
///
/// Statistics collaborators hand `clone_empty` copies to independent workers
/// and feed them keys through `add`.
pub trait SetFilter {
    /// Insert a key. `false` signals a (possible) collision with prior content.
    fn add(&mut self, key: &[u8]) -> bool;

    /// Zeroed filter with the same parameters, sharing no storage
    fn clone_empty(&self) -> Self
    where
        Self: Sized;
}

impl SetFilter for BloomFilter {
    fn add(&mut self, key: &[u8]) -> bool {
        BloomFilter::add(self, key)
    }

    fn clone_empty(&self) -> Self {
        BloomFilter::clone_empty(self)
    }
}

impl SetFilter for InvertibleBloomFilter {
    fn add(&mut self, key: &[u8]) -> bool {
        InvertibleBloomFilter::add(self, key)
    }

    fn clone_empty(&self) -> Self {
        InvertibleBloomFilter::clone_empty(self)
    }
}

/// Primary reconciliation API (Driving Port)
pub trait ReconciliationApi: Send + Sync {
    /// Build a filter over a local key set using the shared parameters
    fn build_filter<I>(&self, keys: I) -> Result<InvertibleBloomFilter, FilterError>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>;

    /// Compute `local - remote` and decode it.
    ///
    /// `remaining` holds keys only `local` has, `missing` keys only `remote`
    /// has. `local` is left untouched.
    fn reconcile(
        &self,
        local: &InvertibleBloomFilter,
        remote: &InvertibleBloomFilter,
    ) -> Result<Decoded, FilterError>;
}
