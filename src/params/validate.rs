//! Cross-field invariants checked when a bundle is built

use super::{NetworkVariant, ParameterBundle, PowParameters};
use crate::codec::{DecodedGenesis, GenesisDescriptor};
use crate::deployment::check_deployments;
use crate::error::{RegistryError, RegistryResult};
use crate::pow::{compact_to_target, hash_meets_compact, target_to_compact, u256_to_be_hex};
use std::fmt::Display;
use tracing::warn;

fn mismatch(
    variant: NetworkVariant,
    field: &'static str,
    expected: impl Display,
    actual: impl Display,
) -> RegistryError {
    RegistryError::GenesisMismatch {
        variant,
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn malformed(variant: NetworkVariant, field: &'static str, reason: String) -> RegistryError {
    RegistryError::MalformedConstant {
        variant,
        field,
        reason,
    }
}

/// Heights strictly increasing and `last` equal to the highest one (0 if none)
pub(super) fn check_checkpoint_table(
    variant: NetworkVariant,
    checkpoints: &[(u32, &str)],
    last: u32,
) -> RegistryResult<()> {
    for pair in checkpoints.windows(2) {
        if pair[1].0 <= pair[0].0 {
            return Err(RegistryError::CheckpointOrderingViolation {
                variant,
                reason: format!("height {} follows height {}", pair[1].0, pair[0].0),
            });
        }
    }

    let highest = checkpoints.last().map_or(0, |(height, _)| *height);
    if last != highest {
        return Err(RegistryError::CheckpointOrderingViolation {
            variant,
            reason: format!("last checkpoint is {} but highest height is {}", last, highest),
        });
    }

    Ok(())
}

/// Compare the declared genesis identity with what the raw block decodes to
pub(super) fn check_genesis(
    variant: NetworkVariant,
    declared: &GenesisDescriptor,
    decoded: &DecodedGenesis,
) -> RegistryResult<()> {
    let actual = &decoded.descriptor;

    if declared.height != 0 {
        return Err(mismatch(variant, "height", 0, declared.height));
    }
    if !declared.prev_block.is_zero() {
        return Err(mismatch(variant, "prev_block", "zero hash", declared.prev_block));
    }
    if actual.hash != declared.hash {
        return Err(mismatch(variant, "hash", declared.hash, actual.hash));
    }
    if actual.merkle_root != declared.merkle_root {
        return Err(mismatch(variant, "merkle_root", declared.merkle_root, actual.merkle_root));
    }
    if actual.prev_block != declared.prev_block {
        return Err(mismatch(variant, "prev_block", declared.prev_block, actual.prev_block));
    }
    if actual.version != declared.version {
        return Err(mismatch(variant, "version", declared.version, actual.version));
    }
    if actual.time != declared.time {
        return Err(mismatch(variant, "time", declared.time, actual.time));
    }
    if actual.bits != declared.bits {
        return Err(mismatch(variant, "bits", declared.bits, actual.bits));
    }
    if actual.nonce != declared.nonce {
        return Err(mismatch(variant, "nonce", declared.nonce, actual.nonce));
    }

    // One transaction: the merkle root is the coinbase txid
    let txid = decoded.coinbase.txid();
    if txid != declared.merkle_root {
        return Err(mismatch(variant, "coinbase txid", declared.merkle_root, txid));
    }

    if !hash_meets_compact(&declared.hash, declared.bits) {
        return Err(mismatch(
            variant,
            "proof of work",
            format!("hash at or below target {:#010x}", declared.bits),
            declared.hash.to_display_hex(),
        ));
    }

    Ok(())
}

/// Compact round trip, retarget arithmetic and genesis difficulty
pub(super) fn check_pow(
    variant: NetworkVariant,
    pow: &PowParameters,
    genesis: &GenesisDescriptor,
) -> RegistryResult<()> {
    if compact_to_target(pow.bits) != pow.limit || target_to_compact(pow.limit) != pow.bits {
        return Err(RegistryError::CompactEncodingMismatch {
            variant,
            bits: pow.bits,
            limit: u256_to_be_hex(&pow.limit),
        });
    }

    let retarget_mismatch = || RegistryError::RetargetMismatch {
        variant,
        interval: pow.retarget_interval,
        timespan: pow.target_timespan,
        spacing: pow.target_spacing,
    };
    if pow.target_spacing == 0 || pow.target_timespan == 0 {
        return Err(retarget_mismatch());
    }
    if pow.target_timespan % pow.target_spacing != 0
        || pow.target_timespan / pow.target_spacing != pow.retarget_interval
    {
        return Err(retarget_mismatch());
    }

    if compact_to_target(genesis.bits) > pow.limit {
        return Err(mismatch(
            variant,
            "bits",
            format!("target at or below {}", u256_to_be_hex(&pow.limit)),
            format!("{:#010x}", genesis.bits),
        ));
    }

    Ok(())
}

/// Remaining whole-bundle invariants
pub(super) fn check_bundle(bundle: &ParameterBundle) -> RegistryResult<()> {
    let variant = bundle.variant();

    if let Err(e) = check_deployments(variant, &bundle.deployments) {
        warn!("{} deployment table rejected: {}", variant, e);
        return Err(e);
    }

    if bundle.halving_interval == 0 {
        return Err(malformed(variant, "halving interval", "must be positive".to_string()));
    }

    if bundle.miner_window == 0 || bundle.activation_threshold > bundle.miner_window {
        return Err(malformed(
            variant,
            "activation threshold",
            format!(
                "threshold {} must not exceed non-empty window {}",
                bundle.activation_threshold, bundle.miner_window
            ),
        ));
    }

    for deployment in &bundle.deployments {
        let threshold = bundle.deployment_threshold(deployment);
        let window = bundle.deployment_window(deployment);
        if window == 0 || threshold > window {
            return Err(malformed(
                variant,
                "deployment quorum",
                format!(
                    "deployment {:?} needs {} of {} blocks",
                    deployment.name, threshold, window
                ),
            ));
        }
    }

    let relay = &bundle.relay_policy;
    if relay.fee_rate > relay.max_fee_rate {
        return Err(malformed(
            variant,
            "fee rate",
            format!("{} exceeds maximum {}", relay.fee_rate, relay.max_fee_rate),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::mainnet::MAIN;
    use crate::params::regtest::REGTEST;
    use crate::params::testnet::TESTNET;
    use crate::params::StaticParams;

    fn build(raw: &StaticParams) -> RegistryResult<ParameterBundle> {
        ParameterBundle::from_static(raw)
    }

    #[test]
    fn test_builtin_tables_build() {
        for raw in [&MAIN, &TESTNET, &REGTEST] {
            let bundle = build(raw).unwrap();
            assert_eq!(bundle.variant(), raw.variant);
        }
    }

    #[test]
    fn test_checkpoint_table_ordering() {
        let v = NetworkVariant::Main;
        assert!(check_checkpoint_table(v, &[], 0).is_ok());
        assert!(check_checkpoint_table(v, &[(10, "a"), (20, "b")], 20).is_ok());
        assert!(matches!(
            check_checkpoint_table(v, &[(20, "a"), (10, "b")], 20),
            Err(RegistryError::CheckpointOrderingViolation { .. })
        ));
        assert!(matches!(
            check_checkpoint_table(v, &[(10, "a"), (10, "b")], 10),
            Err(RegistryError::CheckpointOrderingViolation { .. })
        ));
        assert!(matches!(
            check_checkpoint_table(v, &[(10, "a")], 0),
            Err(RegistryError::CheckpointOrderingViolation { .. })
        ));
        assert!(matches!(
            check_checkpoint_table(v, &[], 5),
            Err(RegistryError::CheckpointOrderingViolation { .. })
        ));
    }

    #[test]
    fn test_wrong_declared_hash_rejected() {
        let mut raw = MAIN;
        raw.genesis.hash = TESTNET.genesis.hash;
        match build(&raw) {
            Err(RegistryError::GenesisMismatch { field, .. }) => assert_eq!(field, "hash"),
            other => panic!("expected genesis mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_declared_merkle_root_rejected() {
        let mut raw = MAIN;
        raw.genesis.merkle_root =
            "0000000000000000000000000000000000000000000000000000000000000001";
        match build(&raw) {
            Err(RegistryError::GenesisMismatch { field, .. }) => assert_eq!(field, "merkle_root"),
            other => panic!("expected genesis mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_declared_nonce_rejected() {
        let mut raw = MAIN;
        raw.genesis.nonce += 1;
        match build(&raw) {
            Err(RegistryError::GenesisMismatch { field, .. }) => assert_eq!(field, "nonce"),
            other => panic!("expected genesis mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_nonzero_genesis_height_rejected() {
        let mut raw = REGTEST;
        raw.genesis.height = 1;
        match build(&raw) {
            Err(RegistryError::GenesisMismatch { field, .. }) => assert_eq!(field, "height"),
            other => panic!("expected genesis mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_genesis_block_of_other_network_rejected() {
        let mut raw = MAIN;
        raw.genesis_block = REGTEST.genesis_block;
        assert!(matches!(
            build(&raw),
            Err(RegistryError::GenesisMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupt_genesis_hex_reported_as_codec_error() {
        let mut raw = TESTNET;
        raw.genesis_block = "0400";
        assert!(matches!(
            build(&raw),
            Err(RegistryError::Codec {
                variant: NetworkVariant::Testnet,
                ..
            })
        ));
    }

    #[test]
    fn test_lossy_pow_limit_rejected() {
        let mut raw = MAIN;
        raw.pow.limit = "000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        assert!(matches!(
            build(&raw),
            Err(RegistryError::CompactEncodingMismatch { bits: 0x1e00ffff, .. })
        ));
    }

    #[test]
    fn test_retarget_interval_must_divide_exactly() {
        let mut raw = MAIN;
        raw.pow.retarget_interval = 11;
        assert!(matches!(build(&raw), Err(RegistryError::RetargetMismatch { .. })));

        let mut raw = MAIN;
        raw.pow.target_spacing = 70;
        assert!(matches!(build(&raw), Err(RegistryError::RetargetMismatch { .. })));

        let mut raw = MAIN;
        raw.pow.target_spacing = 0;
        assert!(matches!(build(&raw), Err(RegistryError::RetargetMismatch { .. })));
    }

    #[test]
    fn test_genesis_easier_than_limit_rejected() {
        let mut raw = REGTEST;
        raw.pow.limit = "000000ffff000000000000000000000000000000000000000000000000000000";
        raw.pow.bits = 0x1e00ffff;
        match build(&raw) {
            Err(RegistryError::GenesisMismatch { field, .. }) => assert_eq!(field, "bits"),
            other => panic!("expected genesis bits mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_deployment_threshold_above_window_rejected() {
        let mut raw = MAIN;
        raw.activation_threshold = raw.miner_window + 1;
        assert!(matches!(
            build(&raw),
            Err(RegistryError::MalformedConstant {
                field: "activation threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_hash_constant_rejected() {
        let mut raw = MAIN;
        raw.genesis.prev_block = "00";
        assert!(matches!(
            build(&raw),
            Err(RegistryError::MalformedConstant {
                field: "genesis prev_block",
                ..
            })
        ));
    }
}
