//! Per-network consensus parameter bundles
//!
//! Each network is described twice: once as a declarative constant table
//! ([`StaticParams`], in `mainnet.rs` / `testnet.rs` / `regtest.rs`) and once as
//! the typed, validated [`ParameterBundle`] built from it when the registry is
//! constructed. Bundles are never mutated after that.

mod build;
pub mod mainnet;
mod network;
pub mod regtest;
pub mod testnet;
mod validate;

pub use network::NetworkVariant;

use crate::codec::{Coinbase, GenesisDescriptor};
use crate::deployment::{DeploymentParameters, StaticDeployment};
use crate::hash::Hash256;
use crate::pow::{serialize_u256, ChainWork, U256};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Constant table layout
// ---------------------------------------------------------------------------

/// Genesis header as declared in a constant table (hashes in wire order)
#[derive(Debug, Clone, Copy)]
pub struct StaticGenesis {
    pub version: i32,
    pub hash: &'static str,
    pub prev_block: &'static str,
    pub merkle_root: &'static str,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u32,
}

/// Proof-of-work constants; `limit` and `chainwork` are big-endian hex
#[derive(Debug, Clone, Copy)]
pub struct StaticPow {
    pub limit: &'static str,
    pub bits: u32,
    pub chainwork: &'static str,
    pub target_timespan: u32,
    pub target_spacing: u32,
    pub retarget_interval: u32,
    pub target_reset: bool,
    pub no_retargeting: bool,
}

/// Historical soft-fork activation; `None` height means not yet activated
#[derive(Debug, Clone, Copy)]
pub struct StaticSoftFork {
    pub height: Option<u32>,
    pub hash: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct StaticBlockPolicy {
    pub bip34: StaticSoftFork,
    pub bip65: StaticSoftFork,
    pub bip66: StaticSoftFork,
    pub prune_after_height: u32,
    pub keep_blocks: u32,
    pub max_tip_age: u64,
    pub slow_height: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct StaticKeyPrefix {
    pub privkey: u8,
    pub xpubkey: u32,
    pub xprivkey: u32,
    pub xpubkey58: &'static str,
    pub xprivkey58: &'static str,
    pub coin_type: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct StaticAddressPrefix {
    pub pubkeyhash: u8,
    pub scripthash: u8,
    pub bech32: &'static str,
}

/// Declarative description of one network
#[derive(Debug, Clone, Copy)]
pub struct StaticParams {
    pub variant: NetworkVariant,
    pub seeds: &'static [&'static str],
    pub magic: u32,
    pub port: u16,
    /// (height, wire-order hash) pairs in ascending height order
    pub checkpoints: &'static [(u32, &'static str)],
    pub last_checkpoint: u32,
    pub halving_interval: u32,
    pub genesis: StaticGenesis,
    /// Raw serialized genesis block
    pub genesis_block: &'static str,
    pub pow: StaticPow,
    pub block: StaticBlockPolicy,
    pub bip30: &'static [(u32, &'static str)],
    pub activation_threshold: u32,
    pub miner_window: u32,
    /// In signaling bit order
    pub deployments: &'static [StaticDeployment],
    pub key_prefix: StaticKeyPrefix,
    pub address_prefix: StaticAddressPrefix,
    pub require_standard: bool,
    pub rpc_port: u16,
    pub wallet_port: u16,
    pub min_relay: u64,
    pub fee_rate: u64,
    pub max_fee_rate: u64,
    pub self_connect: bool,
    pub request_mempool: bool,
}

// ---------------------------------------------------------------------------
// Validated bundle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub variant: NetworkVariant,
    /// Wire protocol message start marker
    pub magic: u32,
    pub port: u16,
    pub rpc_port: u16,
    pub wallet_port: u16,
}

/// Hard-coded (height, hash) pairs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Checkpoints {
    map: BTreeMap<u32, Hash256>,
    last: u32,
}

impl Checkpoints {
    pub(crate) fn new(map: BTreeMap<u32, Hash256>, last: u32) -> Self {
        Self { map, last }
    }

    pub fn get(&self, height: u32) -> Option<&Hash256> {
        self.map.get(&height)
    }

    /// Height of the highest checkpoint, 0 when there are none
    pub fn last_height(&self) -> u32 {
        self.last
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Checkpoints in ascending height order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Hash256)> + '_ {
        self.map.iter().map(|(height, hash)| (*height, hash))
    }

    /// Highest checkpoint at or below `height`
    pub fn last_at_or_below(&self, height: u32) -> Option<(u32, &Hash256)> {
        self.map
            .range(..=height)
            .next_back()
            .map(|(height, hash)| (*height, hash))
    }

    /// A block agrees with the checkpoints if there is none at its height
    /// or the hashes match
    pub fn agrees_with(&self, height: u32, hash: &Hash256) -> bool {
        self.map.get(&height).map_or(true, |expected| expected == hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenesisParameters {
    /// Declared header identity
    pub descriptor: GenesisDescriptor,
    /// Raw serialized block the descriptor was checked against
    pub block: String,
    pub coinbase: Coinbase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowParameters {
    /// Easiest allowed target
    #[serde(serialize_with = "serialize_u256")]
    pub limit: U256,
    /// Compact encoding of `limit`
    pub bits: u32,
    /// Minimum cumulative work of a valid best chain
    #[serde(serialize_with = "serialize_u256")]
    pub chainwork: U256,
    pub target_timespan: u32,
    pub target_spacing: u32,
    pub retarget_interval: u32,
    pub target_reset: bool,
    pub no_retargeting: bool,
}

impl PowParameters {
    pub fn minimum_chainwork(&self) -> ChainWork {
        ChainWork::new(self.chainwork)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "height")]
pub enum ActivationHeight {
    Height(u32),
    NotActivated,
}

impl ActivationHeight {
    pub fn is_active_at(&self, height: u32) -> bool {
        match self {
            ActivationHeight::Height(activation) => height >= *activation,
            ActivationHeight::NotActivated => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoftForkActivation {
    pub height: ActivationHeight,
    /// Expected hash of the activating block, when known
    pub hash: Option<Hash256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockPolicy {
    pub bip34: SoftForkActivation,
    pub bip65: SoftForkActivation,
    pub bip66: SoftForkActivation,
    /// Safe height to start pruning
    pub prune_after_height: u32,
    /// Blocks always retained when pruning
    pub keep_blocks: u32,
    /// Tip age in seconds beyond which the chain is considered unsynced
    pub max_tip_age: u64,
    /// Height above which block processing is slow enough to log every block
    pub slow_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPrefix {
    pub privkey: u8,
    pub xpubkey: u32,
    pub xprivkey: u32,
    pub xpubkey58: String,
    pub xprivkey58: String,
    /// BIP44 coin type
    pub coin_type: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressPrefix {
    pub pubkeyhash: u8,
    pub scripthash: u8,
    pub bech32: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPolicy {
    pub min_relay: u64,
    pub fee_rate: u64,
    pub max_fee_rate: u64,
    /// Mempool rejects non-standard transactions
    pub require_standard: bool,
    pub self_connect: bool,
    /// Ask peers for their mempool after sync
    pub request_mempool: bool,
}

/// Complete, validated consensus profile for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterBundle {
    pub identity: Identity,
    pub seeds: Vec<String>,
    pub checkpoints: Checkpoints,
    pub halving_interval: u32,
    pub genesis: GenesisParameters,
    pub pow: PowParameters,
    pub block_policy: BlockPolicy,
    /// Historical blocks allowed to contain duplicate transaction ids
    pub bip30: BTreeMap<u32, Hash256>,
    pub activation_threshold: u32,
    pub miner_window: u32,
    pub deployments: Vec<DeploymentParameters>,
    pub key_prefix: KeyPrefix,
    pub address_prefix: AddressPrefix,
    pub relay_policy: RelayPolicy,
}

impl ParameterBundle {
    pub fn variant(&self) -> NetworkVariant {
        self.identity.variant
    }

    pub fn magic(&self) -> u32 {
        self.identity.magic
    }

    pub fn genesis_hash(&self) -> Hash256 {
        self.genesis.descriptor.hash
    }

    pub fn last_checkpoint(&self) -> u32 {
        self.checkpoints.last_height()
    }

    pub fn deployment(&self, name: &str) -> Option<&DeploymentParameters> {
        self.deployments.iter().find(|d| d.name == name)
    }

    pub fn deployment_by_bit(&self, bit: u8) -> Option<&DeploymentParameters> {
        self.deployments.iter().find(|d| d.bit == bit)
    }

    /// Signaling votes required for `deployment`, resolving the network default
    pub fn deployment_threshold(&self, deployment: &DeploymentParameters) -> u32 {
        deployment.threshold_or(self.activation_threshold)
    }

    /// Signaling window for `deployment`, resolving the network default
    pub fn deployment_window(&self, deployment: &DeploymentParameters) -> u32 {
        deployment.window_or(self.miner_window)
    }

    pub fn is_bip30_exception(&self, height: u32, hash: &Hash256) -> bool {
        self.bip30.get(&height) == Some(hash)
    }

    /// Chain summary in the shape of a `getblockchaininfo` response
    pub fn summary(&self) -> serde_json::Value {
        let softforks: serde_json::Map<String, serde_json::Value> = self
            .deployments
            .iter()
            .map(|d| {
                (
                    d.name.clone(),
                    serde_json::json!({
                        "type": "bip9",
                        "bit": d.bit,
                        "activation": d.activation,
                        "threshold": self.deployment_threshold(d),
                        "window": self.deployment_window(d),
                        "required": d.required,
                        "forced": d.is_forced(),
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "chain": self.variant().as_str(),
            "bestblockhash": self.genesis_hash().to_display_hex(),
            "genesis": self.genesis.descriptor,
            "bits": format!("{:08x}", self.pow.bits),
            "minimumchainwork": crate::pow::u256_to_be_hex(&self.pow.chainwork),
            "magic": format!("{:08x}", self.identity.magic),
            "port": self.identity.port,
            "lastcheckpoint": self.last_checkpoint(),
            "softforks": softforks,
        })
    }
}
