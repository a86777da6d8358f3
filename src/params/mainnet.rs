//! Main network

use super::{
    NetworkVariant, StaticAddressPrefix, StaticBlockPolicy, StaticGenesis, StaticKeyPrefix,
    StaticParams, StaticPow, StaticSoftFork,
};
use crate::deployment::{
    StaticDeployment, ALWAYS_ACTIVE, NEVER_ACTIVE, NO_TIMEOUT, USE_NETWORK_DEFAULT,
};

pub const GENESIS_BLOCK: &str = concat!(
    "040000000000000000000000000000000000000000000000000000000000000000000000",
    "a49026712f1e8636f3f52d69b8b8e711aefc5f9dc002d56a695b73a851262c087045c25a",
    "ffff001e9ff6430001020000000100000000000000000000000000000000000000000000",
    "00000000000000000000ffffffff310004ffff001e01042848652069732072656e646572",
    "696e672070617374612073696e63652030332f4170722f323031382effffffff01a3e42e",
    "01000000001976a914a8afa48c98f70c3ccbc173fcdd49b6c62e24032688ac00000000",
);

const DEPLOYMENTS: &[StaticDeployment] = &[
    StaticDeployment {
        name: "csv",
        bit: 0,
        start_time: ALWAYS_ACTIVE,
        timeout: NO_TIMEOUT,
        threshold: USE_NETWORK_DEFAULT,
        window: USE_NETWORK_DEFAULT,
        required: false,
        force: true,
    },
    StaticDeployment {
        name: "segwit",
        bit: 1,
        start_time: ALWAYS_ACTIVE,
        timeout: NO_TIMEOUT,
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
        start_time: 1_199_145_601,
        timeout: 1_230_767_999,
        threshold: USE_NETWORK_DEFAULT,
        window: USE_NETWORK_DEFAULT,
        required: false,
        force: true,
    },
];

pub static MAIN: StaticParams = StaticParams {
    variant: NetworkVariant::Main,
    seeds: &["dnsseed.yama-co.in"],
    magic: 0xc085_a5f1,
    port: 8543,
    checkpoints: &[],
    last_checkpoint: 0,
    halving_interval: 1460,
    genesis: StaticGenesis {
        version: 4,
        hash: "81597128a47d5bb01ffe144d7e0fbb726f2d8e4ef8c531ed26e234ed10000000",
        prev_block: "0000000000000000000000000000000000000000000000000000000000000000",
        merkle_root: "a49026712f1e8636f3f52d69b8b8e711aefc5f9dc002d56a695b73a851262c08",
        time: 1_522_681_200,
        bits: 0x1e00_ffff,
        nonce: 4_454_047,
        height: 0,
    },
    genesis_block: GENESIS_BLOCK,
    pow: StaticPow {
        limit: "000000ffff000000000000000000000000000000000000000000000000000000",
        bits: 0x1e00_ffff,
        // height 101600
        chainwork: "00000000000000000000000000000000000000000000000000007879d1b57672",
        target_timespan: 10 * 60,
        target_spacing: 60,
        retarget_interval: 10,
        target_reset: false,
        no_retargeting: false,
    },
    block: StaticBlockPolicy {
        bip34: StaticSoftFork { height: Some(0), hash: None },
        bip65: StaticSoftFork { height: Some(0), hash: None },
        bip66: StaticSoftFork { height: Some(0), hash: None },
        prune_after_height: 1000,
        keep_blocks: 288,
        max_tip_age: 86_400,
        slow_height: 325_000,
    },
    bip30: &[],
    activation_threshold: 16_128,
    miner_window: 20_160,
    deployments: DEPLOYMENTS,
    key_prefix: StaticKeyPrefix {
        privkey: 0x80,
        xpubkey: 0x0488_b21e,
        xprivkey: 0x0488_ade4,
        xpubkey58: "xpub",
        xprivkey58: "xprv",
        coin_type: 0,
    },
    address_prefix: StaticAddressPrefix {
        pubkeyhash: 28,
        scripthash: 78,
        bech32: "xyc",
    },
    require_standard: true,
    rpc_port: 8712,
    wallet_port: 8544,
    min_relay: 0,
    fee_rate: 0,
    max_fee_rate: 400_000,
    self_connect: false,
    request_mempool: false,
};
