//! 256-bit word model
//!
//! Every stack value is a [`Word`]. Arithmetic wraps modulo 2^256; signed
//! operations reinterpret words as two's complement.

use crate::error::{EvmError, EvmResult};

/// 256-bit unsigned stack word
pub type Word = primitive_types::U256;

/// Width of a word in bytes
pub const WORD_BYTES: usize = 32;

/// Build a word from up to 32 big-endian bytes, zero-padded on the left
pub fn from_be_slice(bytes: &[u8]) -> EvmResult<Word> {
    if bytes.len() > WORD_BYTES {
        return Err(EvmError::ImmediateTooWide(bytes.len()));
    }
    Ok(Word::from_big_endian(bytes))
}

/// Build a word from up to 32 little-endian bytes, zero-padded at the high end
pub fn from_le_slice(bytes: &[u8]) -> EvmResult<Word> {
    if bytes.len() > WORD_BYTES {
        return Err(EvmError::ImmediateTooWide(bytes.len()));
    }
    Ok(Word::from_little_endian(bytes))
}

/// Big-endian 32-byte encoding
pub fn to_be_bytes(value: &Word) -> [u8; WORD_BYTES] {
    let mut out = [0u8; WORD_BYTES];
    value.to_big_endian(&mut out);
    out
}

/// Little-endian 32-byte encoding
pub fn to_le_bytes(value: &Word) -> [u8; WORD_BYTES] {
    let mut out = [0u8; WORD_BYTES];
    value.to_little_endian(&mut out);
    out
}

/// Number of significant bytes in the big-endian encoding (0 for zero)
pub fn byte_len(value: &Word) -> usize {
    value.bits().div_ceil(8)
}

/// Convert to `usize` if the value fits
pub fn to_usize(value: &Word) -> Option<usize> {
    if value.bits() > 64 {
        return None;
    }
    usize::try_from(value.low_u64()).ok()
}

/// Sign bit of the two's complement reading
pub fn is_negative(value: &Word) -> bool {
    value.bit(255)
}

/// Two's complement negation, modulo 2^256
pub fn negate(value: Word) -> Word {
    (!value).overflowing_add(Word::one()).0
}

/// (a + b) mod 2^256
pub fn add(a: Word, b: Word) -> Word {
    a.overflowing_add(b).0
}

/// (a * b) mod 2^256
pub fn mul(a: Word, b: Word) -> Word {
    a.overflowing_mul(b).0
}

/// Signed a / b, truncating toward zero. `None` when `b` is zero.
///
/// `MIN / -1` wraps back to `MIN`.
pub fn sdiv(a: Word, b: Word) -> Option<Word> {
    if b.is_zero() {
        return None;
    }
    let a_neg = is_negative(&a);
    let b_neg = is_negative(&b);
    let abs_a = if a_neg { negate(a) } else { a };
    let abs_b = if b_neg { negate(b) } else { b };
    let quotient = abs_a / abs_b;
    if a_neg != b_neg {
        Some(negate(quotient))
    } else {
        Some(quotient)
    }
}

/// base^exponent mod 2^256 by repeated squaring
pub fn exp(base: Word, exponent: Word) -> Word {
    let mut base = base;
    let mut exponent = exponent;
    let mut result = Word::one();
    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = mul(result, base);
        }
        base = mul(base, base);
        exponent = exponent >> 1;
    }
    result
}
