//! IBF cell: signed count plus XOR-accumulated key and digest sums

use serde::{Deserialize, Serialize};
use std::fmt;

use super::bytes;

/// A single invertible filter bucket
///
/// `count` may go negative after deletion or subtraction. `key_sum` and
/// `hash_sum` follow the same XOR rule, so only the net state matters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    count: i64,
    key_sum: Vec<u8>,
    hash_sum: u32,
}

impl Bucket {
    /// Zeroed bucket for keys of `key_length` bytes
    pub fn new(key_length: usize) -> Self {
        Self {
            count: 0,
            key_sum: vec![0u8; key_length],
            hash_sum: 0,
        }
    }

    pub fn add(&mut self, key: &[u8], hash: u32) {
        self.count += 1;
        self.update(key, hash);
    }

    pub fn delete(&mut self, key: &[u8], hash: u32) {
        self.count -= 1;
        self.update(key, hash);
    }

    /// Bucket-wise `self - other`
    pub fn subtract(&mut self, other: &Bucket) {
        self.count -= other.count;
        self.update(&other.key_sum, other.hash_sum);
    }

    fn update(&mut self, key: &[u8], hash: u32) {
        bytes::xor_assign(&mut self.key_sum, key);
        self.hash_sum ^= hash;
    }

    /// Net state is zero in every field
    pub fn is_empty(&self) -> bool {
        self.count == 0 && self.hash_sum == 0 && bytes::is_zero(&self.key_sum)
    }

    /// Count is ±1 and `hash_sum` is the digest of `key_sum`
    pub fn is_pure(&self, key_hash: impl Fn(&[u8]) -> u32) -> bool {
        (self.count == 1 || self.count == -1) && key_hash(&self.key_sum) == self.hash_sum
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn key_sum(&self) -> &[u8] {
        &self.key_sum
    }

    pub fn hash_sum(&self) -> u32 {
        self.hash_sum
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[count: {:3}, keySum: {}, hashSum: {:10}]",
            self.count,
            hex::encode(&self.key_sum),
            self.hash_sum
        )
    }
}
