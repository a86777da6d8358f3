//! Proof-of-work difficulty model
//!
//! Compact ("bits") encoding of 256-bit targets, per-block work and
//! cumulative chainwork. Everything here is pure arithmetic over [`U256`].

use crate::hash::Hash256;
use serde::{Serialize, Serializer};
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer used for targets and chainwork
    pub struct U256(4);
}

/// Sign bit of the compact mantissa
pub const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Mantissa bits of a compact value
pub const COMPACT_MANTISSA_MASK: u32 = 0x007f_ffff;

/// Decode compact bits, returning `None` for negative or overflowing values
///
/// The low 23 bits are the mantissa and the top byte is the size of the
/// value in bytes.
pub fn compact_to_target_checked(bits: u32) -> Option<U256> {
    let size = bits >> 24;
    let mantissa = bits & COMPACT_MANTISSA_MASK;

    if bits & COMPACT_SIGN_BIT != 0 && mantissa != 0 {
        return None;
    }

    if size <= 3 {
        return Some(U256::from(mantissa >> (8 * (3 - size))));
    }

    let overflow = mantissa != 0
        && (size > 34 || (mantissa > 0xff && size > 33) || (mantissa > 0xffff && size > 32));
    if overflow {
        return None;
    }

    Some(U256::from(mantissa) << (8 * (size as usize - 3)))
}

/// Decode compact bits into a target
///
/// Negative and overflowing encodings decode to zero, which no hash can meet.
pub fn compact_to_target(bits: u32) -> U256 {
    compact_to_target_checked(bits).unwrap_or_default()
}

/// Encode a target into the smallest compact form that decodes back to it
/// at compact precision
pub fn target_to_compact(target: U256) -> u32 {
    let mut size = (target.bits() + 7) / 8;
    let mut compact = if size <= 3 {
        (target.low_u64() << (8 * (3 - size))) as u32
    } else {
        (target >> (8 * (size - 3))).low_u32()
    };

    // Keep the mantissa positive
    if compact & COMPACT_SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact | ((size as u32) << 24)
}

/// Expected number of hashes needed to meet `target`
///
/// Computed as `2^256 / (target + 1)`, written so that it fits in 256 bits.
/// A zero target has no valid proof and counts as zero work.
pub fn block_work(target: U256) -> U256 {
    if target.is_zero() {
        return U256::zero();
    }
    match target.checked_add(U256::one()) {
        Some(divisor) => (!target / divisor) + U256::one(),
        None => U256::one(),
    }
}

/// Work represented by a block carrying compact `bits`
pub fn work_from_compact(bits: u32) -> U256 {
    block_work(compact_to_target(bits))
}

/// Interpret a wire-order hash as an integer
pub fn hash_to_u256(hash: &Hash256) -> U256 {
    U256::from_little_endian(hash.as_bytes())
}

/// Whether a wire-order hash satisfies the target encoded by `bits`
pub fn hash_meets_compact(hash: &Hash256, bits: u32) -> bool {
    match compact_to_target_checked(bits) {
        Some(target) if !target.is_zero() => hash_to_u256(hash) <= target,
        _ => false,
    }
}

/// Parse a big-endian hex value of at most 32 bytes
pub fn u256_from_be_hex(s: &str) -> Result<U256, hex::FromHexError> {
    let bytes = hex::decode(s)?;
    if bytes.len() > 32 {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    Ok(U256::from_big_endian(&bytes))
}

/// Render a value as 64 big-endian hex digits
pub fn u256_to_be_hex(value: &U256) -> String {
    hex::encode(value.to_big_endian())
}

pub(crate) fn serialize_u256<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&u256_to_be_hex(value))
}

/// Cumulative proof-of-work of a chain
///
/// Only ever grows as blocks are appended; addition saturates instead of
/// wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize)]
pub struct ChainWork(#[serde(serialize_with = "serialize_u256")] U256);

impl ChainWork {
    pub fn zero() -> Self {
        ChainWork(U256::zero())
    }

    pub fn new(value: U256) -> Self {
        ChainWork(value)
    }

    pub fn value(&self) -> U256 {
        self.0
    }

    /// Chainwork after appending a block with the given compact bits
    #[must_use]
    pub fn accumulate(self, bits: u32) -> Self {
        self.add_work(work_from_compact(bits))
    }

    #[must_use]
    pub fn add_work(self, work: U256) -> Self {
        ChainWork(self.0.saturating_add(work))
    }

    /// Whether this chain carries at least `minimum` work
    pub fn meets_minimum(&self, minimum: U256) -> bool {
        self.0 >= minimum
    }
}

impl From<U256> for ChainWork {
    fn from(value: U256) -> Self {
        ChainWork(value)
    }
}
