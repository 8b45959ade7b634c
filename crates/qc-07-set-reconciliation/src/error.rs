//! Error types for the set reconciliation subsystem

use thiserror::Error;

use crate::domain::Decoded;

/// Errors that can occur in the set reconciliation subsystem
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("subtraction failed: {0}")]
    ConfigMismatch(#[from] ConfigMismatch),

    /// Peeling stalled with non-empty buckets left. `partial` holds the keys
    /// recovered before the stall.
    #[error("decode failed: {unresolved} buckets could not be peeled")]
    DecodeIncomplete { unresolved: usize, partial: Decoded },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Which parameter differs between two invertible filters
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigMismatch {
    #[error("unequal number of buckets, expected ({expected}) got ({got})")]
    BucketCount { expected: usize, got: usize },

    #[error("key seeds do not match, expected ({expected}) got ({got})")]
    KeySeed { expected: u32, got: u32 },

    #[error("key lengths do not match, expected ({expected}) got ({got})")]
    KeyLength { expected: usize, got: usize },

    /// Seeds are reported sorted
    #[error("index seeds do not match, expected {expected:?} got {got:?}")]
    IndexSeeds { expected: Vec<u32>, got: Vec<u32> },
}

impl FilterError {
    /// Keys recovered before a failed decode, if any.
    pub fn partial_decode(&self) -> Option<&Decoded> {
        match self {
            FilterError::DecodeIncomplete { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
