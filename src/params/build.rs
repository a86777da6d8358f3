//! Building typed bundles from the constant tables

use super::validate;
use super::{
    ActivationHeight, AddressPrefix, BlockPolicy, Checkpoints, GenesisParameters, Identity,
    KeyPrefix, NetworkVariant, ParameterBundle, PowParameters, RelayPolicy, SoftForkActivation,
    StaticParams, StaticSoftFork,
};
use crate::codec::{decode_genesis, GenesisDescriptor};
use crate::deployment::DeploymentParameters;
use crate::error::{RegistryError, RegistryResult};
use crate::hash::Hash256;
use crate::pow::{u256_from_be_hex, U256};
use std::collections::BTreeMap;
use tracing::debug;

fn parse_hash(variant: NetworkVariant, field: &'static str, hex: &str) -> RegistryResult<Hash256> {
    Hash256::from_hex(hex).map_err(|e| RegistryError::MalformedConstant {
        variant,
        field,
        reason: e.to_string(),
    })
}

fn parse_u256(variant: NetworkVariant, field: &'static str, hex: &str) -> RegistryResult<U256> {
    u256_from_be_hex(hex).map_err(|e| RegistryError::MalformedConstant {
        variant,
        field,
        reason: e.to_string(),
    })
}

fn parse_height_map(
    variant: NetworkVariant,
    field: &'static str,
    entries: &[(u32, &str)],
) -> RegistryResult<BTreeMap<u32, Hash256>> {
    entries
        .iter()
        .map(|(height, hex)| -> RegistryResult<(u32, Hash256)> {
            Ok((*height, parse_hash(variant, field, hex)?))
        })
        .collect()
}

fn soft_fork(
    variant: NetworkVariant,
    field: &'static str,
    raw: &StaticSoftFork,
) -> RegistryResult<SoftForkActivation> {
    Ok(SoftForkActivation {
        height: raw
            .height
            .map_or(ActivationHeight::NotActivated, ActivationHeight::Height),
        hash: raw.hash.map(|hex| parse_hash(variant, field, hex)).transpose()?,
    })
}

impl ParameterBundle {
    /// Build and validate the bundle described by a constant table
    ///
    /// Decodes the raw genesis block and checks it, together with every
    /// cross-field invariant, against the declared values. Any failure means
    /// the table itself is corrupt.
    pub fn from_static(raw: &StaticParams) -> RegistryResult<Self> {
        let variant = raw.variant;
        debug!("building {} parameters", variant);

        validate::check_checkpoint_table(variant, raw.checkpoints, raw.last_checkpoint)?;
        let checkpoints = Checkpoints::new(
            parse_height_map(variant, "checkpoint hash", raw.checkpoints)?,
            raw.last_checkpoint,
        );
        let bip30 = parse_height_map(variant, "bip30 hash", raw.bip30)?;

        let declared = GenesisDescriptor {
            version: raw.genesis.version,
            hash: parse_hash(variant, "genesis hash", raw.genesis.hash)?,
            prev_block: parse_hash(variant, "genesis prev_block", raw.genesis.prev_block)?,
            merkle_root: parse_hash(variant, "genesis merkle_root", raw.genesis.merkle_root)?,
            time: raw.genesis.time,
            bits: raw.genesis.bits,
            nonce: raw.genesis.nonce,
            height: raw.genesis.height,
        };
        let decoded = decode_genesis(raw.genesis_block)
            .map_err(|source| RegistryError::Codec { variant, source })?;
        validate::check_genesis(variant, &declared, &decoded)?;
        debug!(
            "{} genesis {} decoded and verified",
            variant,
            declared.hash.to_display_hex()
        );

        let pow = PowParameters {
            limit: parse_u256(variant, "pow limit", raw.pow.limit)?,
            bits: raw.pow.bits,
            chainwork: parse_u256(variant, "pow chainwork", raw.pow.chainwork)?,
            target_timespan: raw.pow.target_timespan,
            target_spacing: raw.pow.target_spacing,
            retarget_interval: raw.pow.retarget_interval,
            target_reset: raw.pow.target_reset,
            no_retargeting: raw.pow.no_retargeting,
        };
        validate::check_pow(variant, &pow, &declared)?;

        let deployments = raw
            .deployments
            .iter()
            .map(|d| DeploymentParameters::from_static(variant, d))
            .collect::<RegistryResult<Vec<_>>>()?;

        let bundle = ParameterBundle {
            identity: Identity {
                variant,
                magic: raw.magic,
                port: raw.port,
                rpc_port: raw.rpc_port,
                wallet_port: raw.wallet_port,
            },
            seeds: raw.seeds.iter().map(|s| s.to_string()).collect(),
            checkpoints,
            halving_interval: raw.halving_interval,
            genesis: GenesisParameters {
                descriptor: declared,
                block: raw.genesis_block.to_string(),
                coinbase: decoded.coinbase,
            },
            pow,
            block_policy: BlockPolicy {
                bip34: soft_fork(variant, "bip34 hash", &raw.block.bip34)?,
                bip65: soft_fork(variant, "bip65 hash", &raw.block.bip65)?,
                bip66: soft_fork(variant, "bip66 hash", &raw.block.bip66)?,
                prune_after_height: raw.block.prune_after_height,
                keep_blocks: raw.block.keep_blocks,
                max_tip_age: raw.block.max_tip_age,
                slow_height: raw.block.slow_height,
            },
            bip30,
            activation_threshold: raw.activation_threshold,
            miner_window: raw.miner_window,
            deployments,
            key_prefix: KeyPrefix {
                privkey: raw.key_prefix.privkey,
                xpubkey: raw.key_prefix.xpubkey,
                xprivkey: raw.key_prefix.xprivkey,
                xpubkey58: raw.key_prefix.xpubkey58.to_string(),
                xprivkey58: raw.key_prefix.xprivkey58.to_string(),
                coin_type: raw.key_prefix.coin_type,
            },
            address_prefix: AddressPrefix {
                pubkeyhash: raw.address_prefix.pubkeyhash,
                scripthash: raw.address_prefix.scripthash,
                bech32: raw.address_prefix.bech32.to_string(),
            },
            relay_policy: RelayPolicy {
                min_relay: raw.min_relay,
                fee_rate: raw.fee_rate,
                max_fee_rate: raw.max_fee_rate,
                require_standard: raw.require_standard,
                self_connect: raw.self_connect,
                request_mempool: raw.request_mempool,
            },
        };

        validate::check_bundle(&bundle)?;
        Ok(bundle)
    }
}
