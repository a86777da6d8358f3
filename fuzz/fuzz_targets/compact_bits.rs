#![no_main]
use bllvm_chainparams::pow::{compact_to_target, target_to_compact, work_from_compact};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let bits = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);

    let target = compact_to_target(bits);
    let compact = target_to_compact(target);
    assert_eq!(compact_to_target(compact), target);

    let _ = work_from_compact(bits);
});
