#![no_main]
use bllvm_chainparams::codec::{decode_genesis, decode_genesis_bytes, HEADER_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(decoded) = decode_genesis_bytes(data) {
        // Anything that decodes re-encodes to the same header
        let header = decoded.descriptor.encode_header();
        assert_eq!(&header[..], &data[..HEADER_SIZE]);
        assert_eq!(decoded.descriptor.compute_hash(), decoded.descriptor.hash);
        let _ = decoded.coinbase.script_pushes();
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_genesis(text);
    }
});
