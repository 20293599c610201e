//! Bit-field helpers.
//!
//! The address hash in the vcache interleaving logic is expressed entirely in
//! terms of contiguous bit-fields, so the translator only needs two primitives:
//! 1. **Field extraction:** `select_bits` pulls `width` bits starting at `low`.
//! 2. **Field sizing:** `clog2` gives the number of bits needed to index `n` items.

/// Extracts the `width`-bit field of `value` starting at bit `low`.
///
/// A zero-width field is valid and always yields zero, which happens whenever a
/// dimension of the topology has a single element (one tile column, one-byte
/// blocks).
///
/// # Arguments
///
/// * `value` - The word to extract from.
/// * `low` - Index of the least-significant bit of the field.
/// * `width` - Number of bits in the field.
///
/// # Returns
///
/// The field, right-aligned.
#[inline]
pub const fn select_bits(value: u64, low: u32, width: u32) -> u64 {
    if width == 0 || low >= u64::BITS {
        return 0;
    }
    let shifted = value >> low;
    if width >= u64::BITS {
        shifted
    } else {
        shifted & ((1u64 << width) - 1)
    }
}

/// Ceiling log2: the number of bits needed to index `n` distinct items.
///
/// `clog2(0)` and `clog2(1)` are both zero.
#[inline]
pub const fn clog2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        u64::BITS - (n - 1).leading_zeros()
    }
}

/// Returns `true` if `n` is a non-zero power of two.
#[inline]
pub const fn is_power_of_two(n: u64) -> bool {
    n != 0 && n & (n - 1) == 0
}
