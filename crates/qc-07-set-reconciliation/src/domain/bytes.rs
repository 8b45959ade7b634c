//! Byte buffer operators
//!
//! Bitwise combinators over two equal-length, non-empty byte slices. Every
//! filter in this crate is built from these.
//!
//! Mismatched or empty inputs are programmer errors and panic; they are never
//! truncated to the shorter operand.

#[inline]
fn check_operands(a: &[u8], b: &[u8]) {
    assert!(!a.is_empty(), "byte buffer operands must be non-empty");
    assert_eq!(
        a.len(),
        b.len(),
        "byte buffer operands must have equal length"
    );
}

/// Bitwise AND of two buffers.
pub fn and(a: &[u8], b: &[u8]) -> Vec<u8> {
    check_operands(a, b);
    a.iter().zip(b).map(|(x, y)| x & y).collect()
}

/// Bitwise OR of two buffers.
pub fn or(a: &[u8], b: &[u8]) -> Vec<u8> {
    check_operands(a, b);
    a.iter().zip(b).map(|(x, y)| x | y).collect()
}

/// Bitwise XOR of two buffers.
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    check_operands(a, b);
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// XOR `b` into `a` without allocating.
pub fn xor_assign(a: &mut [u8], b: &[u8]) {
    check_operands(a, b);
    for (x, y) in a.iter_mut().zip(b) {
        *x ^= *y;
    }
}

/// Byte-wise equality.
pub fn eq(a: &[u8], b: &[u8]) -> bool {
    check_operands(a, b);
    a == b
}

/// True if every byte is zero.
pub fn is_zero(a: &[u8]) -> bool {
    a.iter().all(|&b| b == 0)
}
