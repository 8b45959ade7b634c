//! Seeded hash family for both filter kinds
//!
//! Uses MurmurHash3 (x86, 32-bit) with a caller-supplied seed per hash
//! function. Seeds are configuration; nothing here picks or randomizes them.

use std::io::Cursor;

/// Hash a key with MurmurHash3 x86_32 using `seed`.
pub fn murmur_hash(key: &[u8], seed: u32) -> u32 {
    let mut cursor = Cursor::new(key);

    // Reading from an in-memory cursor cannot fail
    murmur3::murmur3_32(&mut cursor, seed).unwrap_or(0)
}

/// Bit positions a key sets in a Bloom fingerprint of `size_bits` bits.
///
/// One position per seed. Two seeds may land on the same bit, so the
/// fingerprint has at most `seeds.len()` bits set.
pub fn fingerprint_positions(key: &[u8], seeds: &[u32], size_bits: usize) -> Vec<usize> {
    seeds
        .iter()
        .map(|&seed| (murmur_hash(key, seed) as u64 % size_bits as u64) as usize)
        .collect()
}

/// Bucket indices a key touches in an IBF with `num_buckets` buckets.
///
/// Duplicates are removed keeping first-occurrence order. Insert and delete
/// must visit exactly the same set, or counts stop cancelling.
pub fn bucket_indices(key: &[u8], seeds: &[u32], num_buckets: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(seeds.len());
    for &seed in seeds {
        let idx = (murmur_hash(key, seed) as u64 % num_buckets as u64) as usize;
        if !indices.contains(&idx) {
            indices.push(idx);
        }
    }
    indices
}
