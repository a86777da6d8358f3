//! Error types for the genesis codec and the parameter registry
//!
//! Codec errors are returned to whoever called the decoder (they may be fed
//! untrusted hex). Registry errors describe a corrupted constant table and are
//! fatal at startup.

use crate::params::NetworkVariant;
use thiserror::Error;

/// Errors produced while decoding a serialized genesis block
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("malformed hex: {0}")]
    MalformedHex(#[from] hex::FromHexError),

    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("genesis block must contain exactly one transaction, found {0}")]
    UnexpectedTransactionCount(u64),

    #[error("invalid coinbase transaction: {0}")]
    InvalidCoinbase(String),

    #[error("{0} trailing bytes after coinbase lock time")]
    TrailingBytes(usize),
}

/// Errors produced while building or querying the parameter registry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("unknown network variant: {0:?}")]
    UnknownVariant(String),

    #[error("{variant}: genesis block failed to decode: {source}")]
    Codec {
        variant: NetworkVariant,
        #[source]
        source: CodecError,
    },

    #[error("{variant}: genesis {field} mismatch (declared {expected}, decoded {actual})")]
    GenesisMismatch {
        variant: NetworkVariant,
        field: &'static str,
        expected: String,
        actual: String,
    },

    #[error("{variant}: deployments {first:?} and {second:?} both signal on bit {bit}")]
    DeploymentBitCollision {
        variant: NetworkVariant,
        bit: u8,
        first: String,
        second: String,
    },

    #[error("{variant}: deployment {name:?} uses bit {bit}, allowed range is 0..={max}")]
    DeploymentBitOutOfRange {
        variant: NetworkVariant,
        name: String,
        bit: u8,
        max: u8,
    },

    #[error("{variant}: deployment name {name:?} is defined more than once")]
    DuplicateDeploymentName { variant: NetworkVariant, name: String },

    #[error("{variant}: checkpoint ordering violated: {reason}")]
    CheckpointOrderingViolation { variant: NetworkVariant, reason: String },

    #[error("{variant}: compact bits {bits:#010x} do not round-trip with pow limit {limit}")]
    CompactEncodingMismatch {
        variant: NetworkVariant,
        bits: u32,
        limit: String,
    },

    #[error(
        "{variant}: retarget interval {interval} != target timespan {timespan} / target spacing {spacing}"
    )]
    RetargetMismatch {
        variant: NetworkVariant,
        interval: u32,
        timespan: u32,
        spacing: u32,
    },

    #[error("{variant}: magic {magic:#010x} is already used by {other}")]
    DuplicateMagic {
        variant: NetworkVariant,
        other: NetworkVariant,
        magic: u32,
    },

    #[error("{variant}: malformed constant {field}: {reason}")]
    MalformedConstant {
        variant: NetworkVariant,
        field: &'static str,
        reason: String,
    },
}

impl RegistryError {
    /// Network variant the error refers to, if any
    pub fn variant(&self) -> Option<NetworkVariant> {
        match self {
            RegistryError::UnknownVariant(_) => None,
            RegistryError::Codec { variant, .. }
            | RegistryError::GenesisMismatch { variant, .. }
            | RegistryError::DeploymentBitCollision { variant, .. }
            | RegistryError::DeploymentBitOutOfRange { variant, .. }
            | RegistryError::DuplicateDeploymentName { variant, .. }
            | RegistryError::CheckpointOrderingViolation { variant, .. }
            | RegistryError::CompactEncodingMismatch { variant, .. }
            | RegistryError::RetargetMismatch { variant, .. }
            | RegistryError::DuplicateMagic { variant, .. }
            | RegistryError::MalformedConstant { variant, .. } => Some(*variant),
        }
    }
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
