//! Bitcoin-compatible hashing for block identities
//!
//! Hashes are kept in wire order, i.e. the byte order in which the double
//! SHA256 digest comes out and in which it is serialized inside headers. The
//! declared genesis constants are written in this order as well. Explorers and
//! RPC output show the byte-reversed form, available via [`Hash256::to_display_hex`].

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a block or transaction hash in bytes
pub const HASH_LEN: usize = 32;

/// 32-byte hash in wire byte order
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256([u8; HASH_LEN]);

impl Hash256 {
    /// The all-zero hash (previous block of every genesis block)
    pub const ZERO: Hash256 = Hash256([0u8; HASH_LEN]);

    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Hash256(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Parse a hash written in wire order
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Hash256(bytes))
    }

    /// Parse a hash written in display (byte-reversed) order
    pub fn from_display_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut hash = Self::from_hex(s)?;
        hash.0.reverse();
        Ok(hash)
    }

    /// Wire-order hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Byte-reversed hex, as shown by explorers and RPC
    pub fn to_display_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; HASH_LEN]> for Hash256 {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Hash256(bytes)
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Calculate Bitcoin double SHA256 hash
///
/// Used for block identity hashes and transaction ids.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    let first_hash = Sha256::digest(data);
    let second_hash = Sha256::digest(first_hash);

    let mut result = [0u8; HASH_LEN];
    result.copy_from_slice(&second_hash);
    Hash256(result)
}

/// Serialize raw bytes (scripts) as a lowercase hex string
pub(crate) fn serialize_hex<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes.as_ref()))
}
