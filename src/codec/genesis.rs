//! Genesis block decoding
//!
//! Decodes the raw hex of a genesis block into its header fields and its
//! single coinbase transaction, and recomputes the block identity hash from
//! the 80-byte header.

use crate::codec::reader::{encode_varint, ByteReader};
use crate::error::{CodecError, CodecResult};
use crate::hash::{double_sha256, serialize_hex, Hash256};
use serde::Serialize;

/// Serialized block header size
pub const HEADER_SIZE: usize = 80;

/// Output index referenced by a coinbase input's null previous output
pub const COINBASE_PREVOUT_INDEX: u32 = 0xffff_ffff;

/// Structured genesis block identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenesisDescriptor {
    pub version: i32,
    pub hash: Hash256,
    pub prev_block: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u32,
}

impl GenesisDescriptor {
    /// Serialize the header fields in wire order
    pub fn encode_header(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&self.version.to_le_bytes());
        header[4..36].copy_from_slice(self.prev_block.as_bytes());
        header[36..68].copy_from_slice(self.merkle_root.as_bytes());
        header[68..72].copy_from_slice(&self.time.to_le_bytes());
        header[72..76].copy_from_slice(&self.bits.to_le_bytes());
        header[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        header
    }

    /// Double SHA256 of the encoded header, in wire order
    pub fn compute_hash(&self) -> Hash256 {
        double_sha256(&self.encode_header())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinbaseInput {
    pub prev_hash: Hash256,
    pub prev_index: u32,
    #[serde(serialize_with = "serialize_hex")]
    pub script: Vec<u8>,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutput {
    pub value: u64,
    #[serde(serialize_with = "serialize_hex")]
    pub script: Vec<u8>,
}

/// The genesis block's only transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coinbase {
    pub version: i32,
    pub input: CoinbaseInput,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

impl Coinbase {
    /// Legacy (non-witness) serialization
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&self.version.to_le_bytes());

        data.extend_from_slice(&encode_varint(1));
        data.extend_from_slice(self.input.prev_hash.as_bytes());
        data.extend_from_slice(&self.input.prev_index.to_le_bytes());
        data.extend_from_slice(&encode_varint(self.input.script.len() as u64));
        data.extend_from_slice(&self.input.script);
        data.extend_from_slice(&self.input.sequence.to_le_bytes());

        data.extend_from_slice(&encode_varint(self.outputs.len() as u64));
        for output in &self.outputs {
            data.extend_from_slice(&output.value.to_le_bytes());
            data.extend_from_slice(&encode_varint(output.script.len() as u64));
            data.extend_from_slice(&output.script);
        }

        data.extend_from_slice(&self.lock_time.to_le_bytes());
        data
    }

    pub fn txid(&self) -> Hash256 {
        double_sha256(&self.serialize())
    }

    /// Sum of all output values, saturating
    pub fn total_value(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |acc, output| acc.saturating_add(output.value))
    }

    /// Items pushed by the coinbase script, in order
    ///
    /// Non-push opcodes show up as empty items.
    pub fn script_pushes(&self) -> CodecResult<Vec<Vec<u8>>> {
        let mut reader = ByteReader::new(&self.input.script);
        let mut pushes = Vec::new();
        while !reader.is_empty() {
            pushes.push(reader.read_push_data()?.to_vec());
        }
        Ok(pushes)
    }
}

/// Result of decoding a raw genesis block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedGenesis {
    pub descriptor: GenesisDescriptor,
    pub coinbase: Coinbase,
}

/// Decode a hex-encoded genesis block
///
/// Accepts upper or lower case hex without a `0x` prefix. The returned
/// descriptor carries the hash recomputed from the header, not a declared one;
/// comparing it against the declared constant is the caller's job.
pub fn decode_genesis(hex_block: &str) -> CodecResult<DecodedGenesis> {
    let bytes = hex::decode(hex_block)?;
    decode_genesis_bytes(&bytes)
}

/// Decode a genesis block from raw bytes
pub fn decode_genesis_bytes(bytes: &[u8]) -> CodecResult<DecodedGenesis> {
    let mut reader = ByteReader::new(bytes);

    let version = reader.read_i32_le()?;
    let prev_block = reader.read_hash()?;
    let merkle_root = reader.read_hash()?;
    let time = reader.read_u32_le()?;
    let bits = reader.read_u32_le()?;
    let nonce = reader.read_u32_le()?;

    let tx_count = reader.read_varint()?;
    if tx_count != 1 {
        return Err(CodecError::UnexpectedTransactionCount(tx_count));
    }

    let coinbase = read_coinbase(&mut reader)?;

    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes(reader.remaining()));
    }

    let mut descriptor = GenesisDescriptor {
        version,
        hash: Hash256::ZERO,
        prev_block,
        merkle_root,
        time,
        bits,
        nonce,
        height: 0,
    };
    descriptor.hash = descriptor.compute_hash();

    Ok(DecodedGenesis {
        descriptor,
        coinbase,
    })
}

fn read_coinbase(reader: &mut ByteReader<'_>) -> CodecResult<Coinbase> {
    let version = reader.read_i32_le()?;

    let input_count = reader.read_varint()?;
    if input_count != 1 {
        return Err(CodecError::InvalidCoinbase(format!(
            "expected exactly one input, found {}",
            input_count
        )));
    }

    let prev_hash = reader.read_hash()?;
    let prev_index = reader.read_u32_le()?;
    if !prev_hash.is_zero() || prev_index != COINBASE_PREVOUT_INDEX {
        return Err(CodecError::InvalidCoinbase(format!(
            "input spends {}:{} instead of the null outpoint",
            prev_hash, prev_index
        )));
    }
    let script = reader.read_var_bytes()?.to_vec();
    let sequence = reader.read_u32_le()?;

    let output_count = reader.read_varint()?;
    if output_count == 0 {
        return Err(CodecError::InvalidCoinbase("no outputs".to_string()));
    }
    let mut outputs = Vec::new();
    for _ in 0..output_count {
        let value = reader.read_u64_le()?;
        let script = reader.read_var_bytes()?.to_vec();
        outputs.push(TxOutput { value, script });
    }

    let lock_time = reader.read_u32_le()?;

    Ok(Coinbase {
        version,
        input: CoinbaseInput {
            prev_hash,
            prev_index,
            script,
            sequence,
        },
        outputs,
        lock_time,
    })
}
