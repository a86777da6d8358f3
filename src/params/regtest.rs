//! Local regression-test network
//!
//! Minimum difficulty, no retargeting and every deployment startable from
//! the first block.

use super::{
    NetworkVariant, StaticAddressPrefix, StaticBlockPolicy, StaticGenesis, StaticKeyPrefix,
    StaticParams, StaticPow, StaticSoftFork,
};
use crate::deployment::{StaticDeployment, ALWAYS_ACTIVE, NEVER_ACTIVE, USE_NETWORK_DEFAULT};

pub const GENESIS_BLOCK: &str = concat!(
    "040000000000000000000000000000000000000000000000000000000000000000000000",
    "a49026712f1e8636f3f52d69b8b8e711aefc5f9dc002d56a695b73a851262c087045c25a",
    "ffff7f20312e010001020000000100000000000000000000000000000000000000000000",
    "00000000000000000000ffffffff310004ffff001e01042848652069732072656e646572",
    "696e672070617374612073696e63652030332f4170722f323031382effffffff01a3e42e",
    "01000000001976a914a8afa48c98f70c3ccbc173fcdd49b6c62e24032688ac00000000",
);

const DEPLOYMENTS: &[StaticDeployment] = &[
    StaticDeployment {
        name: "csv",
        bit: 0,
        start_time: 0,
        timeout: 0xffff_ffff,
        threshold: USE_NETWORK_DEFAULT,
        window: USE_NETWORK_DEFAULT,
        required: false,
        force: true,
    },
    StaticDeployment {
        name: "segwit",
        bit: 1,
        start_time: ALWAYS_ACTIVE,
        timeout: 0xffff_ffff,
        threshold: USE_NETWORK_DEFAULT,
        window: USE_NETWORK_DEFAULT,
        required: true,
        force: false,
    },
    StaticDeployment {
        name: "segsignal",
        bit: 4,
        start_time: NEVER_ACTIVE,
        timeout: 0xffff_ffff,
        threshold: 269,
        window: 336,
        required: false,
        force: false,
    },
    StaticDeployment {
        name: "testdummy",
        bit: 28,
        start_time: 0,
        timeout: 0xffff_ffff,
        threshold: USE_NETWORK_DEFAULT,
        window: USE_NETWORK_DEFAULT,
        required: false,
        force: true,
    },
];

pub static REGTEST: StaticParams = StaticParams {
    variant: NetworkVariant::Regtest,
    seeds: &["127.0.0.1"],
    magic: 0xc289_a5f1,
    port: 27778,
    checkpoints: &[],
    last_checkpoint: 0,
    halving_interval: 146,
    genesis: StaticGenesis {
        version: 4,
        hash: "2dec09207595cf7ca4723e33370c4a99c4515bb1cd6f8b1c825bda8b95388b00",
        prev_block: "0000000000000000000000000000000000000000000000000000000000000000",
        merkle_root: "a49026712f1e8636f3f52d69b8b8e711aefc5f9dc002d56a695b73a851262c08",
        time: 1_522_681_200,
        bits: 0x207f_ffff,
        nonce: 77_361,
        height: 0,
    },
    genesis_block: GENESIS_BLOCK,
    pow: StaticPow {
        limit: "7fffff0000000000000000000000000000000000000000000000000000000000",
        bits: 0x207f_ffff,
        chainwork: "0000000000000000000000000000000000000000000000000000000000000000",
        target_timespan: 10 * 60,
        target_spacing: 60,
        retarget_interval: 10,
        target_reset: true,
        no_retargeting: true,
    },
    block: StaticBlockPolicy {
        bip34: StaticSoftFork { height: Some(100_000_000), hash: None },
        bip65: StaticSoftFork { height: Some(1351), hash: None },
        bip66: StaticSoftFork { height: Some(1251), hash: None },
        prune_after_height: 1000,
        keep_blocks: 10000,
        max_tip_age: 0xffff_ffff,
        slow_height: 0,
    },
    bip30: &[],
    activation_threshold: 936,
    miner_window: 1440,
    deployments: DEPLOYMENTS,
    key_prefix: StaticKeyPrefix {
        privkey: 0xef,
        xpubkey: 0x0435_87cf,
        xprivkey: 0x0435_8394,
        xpubkey58: "tpub",
        xprivkey58: "tprv",
        coin_type: 1,
    },
    address_prefix: StaticAddressPrefix {
        pubkeyhash: 87,
        scripthash: 140,
        bech32: "xycrt",
    },
    require_standard: false,
    rpc_port: 28712,
    wallet_port: 28544,
    min_relay: 0,
    fee_rate: 0,
    max_fee_rate: 60_000,
    self_connect: true,
    request_mempool: true,
};
