//! Minimal cursor over serialized block data
//!
//! Only what the genesis decoder needs: little-endian integers, protocol
//! varints, length-prefixed byte strings and script push operations.

use crate::error::{CodecError, CodecResult};
use crate::hash::{Hash256, HASH_LEN};

/// Script opcodes carrying an explicit length prefix
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Largest opcode that is itself a direct push length
pub const MAX_DIRECT_PUSH: u8 = 0x4b;

/// Reads fields off an immutable byte buffer, advancing a cursor
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> CodecResult<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(CodecError::BufferUnderrun { needed, remaining });
        }
        let slice = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32_le(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32_le(&mut self) -> CodecResult<i32> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64_le(&mut self) -> CodecResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// 32 raw bytes, kept in wire order
    pub fn read_hash(&mut self) -> CodecResult<Hash256> {
        Ok(Hash256::from_bytes(self.take_array::<HASH_LEN>()?))
    }

    /// Protocol variable-length integer
    ///
    /// Values below 0xfd are a single byte; markers 0xfd, 0xfe and 0xff are
    /// followed by a 2, 4 or 8 byte little-endian value.
    pub fn read_varint(&mut self) -> CodecResult<u64> {
        match self.read_u8()? {
            0xfd => Ok(u64::from(self.read_u16_le()?)),
            0xfe => Ok(u64::from(self.read_u32_le()?)),
            0xff => self.read_u64_le(),
            n => Ok(u64::from(n)),
        }
    }

    /// Varint length followed by that many bytes
    pub fn read_var_bytes(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.read_varint()?;
        // A length that does not fit in usize can never be satisfied
        let needed = usize::try_from(len).unwrap_or(usize::MAX);
        self.take(needed)
    }

    /// A single script operation, returning the bytes it pushes
    ///
    /// Opcodes 0x01..=0x4b push that many bytes, OP_PUSHDATA1/2/4 read a
    /// 1/2/4 byte length first. Every other opcode pushes nothing.
    pub fn read_push_data(&mut self) -> CodecResult<&'a [u8]> {
        let opcode = self.read_u8()?;
        let len = match opcode {
            0x01..=MAX_DIRECT_PUSH => usize::from(opcode),
            OP_PUSHDATA1 => usize::from(self.read_u8()?),
            OP_PUSHDATA2 => usize::from(self.read_u16_le()?),
            OP_PUSHDATA4 => usize::try_from(self.read_u32_le()?).unwrap_or(usize::MAX),
            _ => 0,
        };
        self.take(len)
    }
}

/// Encode a number as a protocol varint
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 0xfd {
        vec![value as u8]
    } else if value <= 0xffff {
        let mut result = vec![0xfd];
        result.extend_from_slice(&(value as u16).to_le_bytes());
        result
    } else if value <= 0xffff_ffff {
        let mut result = vec![0xfe];
        result.extend_from_slice(&(value as u32).to_le_bytes());
        result
    } else {
        let mut result = vec![0xff];
        result.extend_from_slice(&value.to_le_bytes());
        result
    }
}
