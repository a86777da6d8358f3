//! Genesis block codec
//!
//! Byte-level primitives plus the decoder that turns a raw genesis block into
//! a [`GenesisDescriptor`] and its coinbase transaction.

pub mod genesis;
pub mod reader;

pub use genesis::{
    decode_genesis, decode_genesis_bytes, Coinbase, CoinbaseInput, DecodedGenesis,
    GenesisDescriptor, TxOutput, COINBASE_PREVOUT_INDEX, HEADER_SIZE,
};
pub use reader::{encode_varint, ByteReader};
