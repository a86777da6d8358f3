//! Genesis codec behavior on the embedded blocks and on damaged input

use bllvm_chainparams::codec::{decode_genesis, decode_genesis_bytes, HEADER_SIZE};
use bllvm_chainparams::params::{mainnet::MAIN, regtest::REGTEST, testnet::TESTNET};
use bllvm_chainparams::pow::hash_meets_compact;
use bllvm_chainparams::CodecError;

// Offsets into the serialized genesis block
const TX_COUNT: usize = HEADER_SIZE;
const INPUT_COUNT: usize = TX_COUNT + 5;
const PREVOUT_INDEX: usize = INPUT_COUNT + 1 + 32;
const OUTPUT_COUNT: usize = 176;
const BLOCK_LEN: usize = 215;

fn main_bytes() -> Vec<u8> {
    hex::decode(MAIN.genesis_block).unwrap()
}

#[test]
fn test_every_network_decodes_to_its_declared_header() {
    for raw in [&MAIN, &TESTNET, &REGTEST] {
        let decoded = decode_genesis(raw.genesis_block).unwrap();
        let header = &decoded.descriptor;
        assert_eq!(header.hash.to_hex(), raw.genesis.hash);
        assert_eq!(header.merkle_root.to_hex(), raw.genesis.merkle_root);
        assert_eq!(header.nonce, raw.genesis.nonce);
        assert_eq!(header.bits, raw.genesis.bits);
        assert_eq!(header.height, 0);
        assert!(hash_meets_compact(&header.hash, header.bits));
    }
}

#[test]
fn test_networks_share_coinbase() {
    let main = decode_genesis(MAIN.genesis_block).unwrap();
    let testnet = decode_genesis(TESTNET.genesis_block).unwrap();
    let regtest = decode_genesis(REGTEST.genesis_block).unwrap();
    assert_eq!(main.coinbase, testnet.coinbase);
    assert_eq!(main.coinbase, regtest.coinbase);
    assert_ne!(main.descriptor.hash, testnet.descriptor.hash);
    assert_ne!(main.descriptor.hash, regtest.descriptor.hash);
}

#[test]
fn test_block_length() {
    assert_eq!(main_bytes().len(), BLOCK_LEN);
}

#[test]
fn test_empty_input_underruns_on_version() {
    assert_eq!(
        decode_genesis("").unwrap_err(),
        CodecError::BufferUnderrun {
            needed: 4,
            remaining: 0
        }
    );
}

#[test]
fn test_missing_transaction_section_underruns() {
    let bytes = main_bytes();
    assert_eq!(
        decode_genesis_bytes(&bytes[..HEADER_SIZE]).unwrap_err(),
        CodecError::BufferUnderrun {
            needed: 1,
            remaining: 0
        }
    );
}

#[test]
fn test_two_transactions_rejected() {
    let mut bytes = main_bytes();
    bytes[TX_COUNT] = 2;
    assert_eq!(
        decode_genesis(&hex::encode(&bytes)).unwrap_err(),
        CodecError::UnexpectedTransactionCount(2)
    );
}

#[test]
fn test_zero_transactions_rejected() {
    let mut bytes = main_bytes();
    bytes[TX_COUNT] = 0;
    assert_eq!(
        decode_genesis_bytes(&bytes).unwrap_err(),
        CodecError::UnexpectedTransactionCount(0)
    );
}

#[test]
fn test_coinbase_with_two_inputs_rejected() {
    let mut bytes = main_bytes();
    bytes[INPUT_COUNT] = 2;
    assert!(matches!(
        decode_genesis_bytes(&bytes),
        Err(CodecError::InvalidCoinbase(_))
    ));
}

#[test]
fn test_coinbase_spending_real_output_rejected() {
    let mut bytes = main_bytes();
    bytes[PREVOUT_INDEX] = 0;
    assert!(matches!(
        decode_genesis_bytes(&bytes),
        Err(CodecError::InvalidCoinbase(_))
    ));
}

#[test]
fn test_coinbase_without_outputs_rejected() {
    let mut bytes = main_bytes();
    bytes[OUTPUT_COUNT] = 0;
    assert!(matches!(
        decode_genesis_bytes(&bytes),
        Err(CodecError::InvalidCoinbase(_))
    ));
}

#[test]
fn test_missing_lock_time_underruns() {
    let bytes = main_bytes();
    assert_eq!(
        decode_genesis_bytes(&bytes[..BLOCK_LEN - 2]).unwrap_err(),
        CodecError::BufferUnderrun {
            needed: 4,
            remaining: 2
        }
    );
}

#[test]
fn test_trailing_bytes_rejected() {
    let hex = format!("{}0000", MAIN.genesis_block);
    assert_eq!(decode_genesis(&hex).unwrap_err(), CodecError::TrailingBytes(2));
}

#[test]
fn test_non_hex_character_rejected() {
    let hex = MAIN.genesis_block.replacen('0', "g", 1);
    assert!(matches!(decode_genesis(&hex), Err(CodecError::MalformedHex(_))));
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = decode_genesis(&MAIN.genesis_block[..20]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "buffer underrun: needed 32 bytes, 6 remaining"
    );
}
