#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use warp_core::DecodeOptions;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000_000 {
        return;
    }

    let mut packed = tempfile::NamedTempFile::new().unwrap();
    packed.write_all(data).unwrap();
    packed.flush().unwrap();

    let restored = tempfile::NamedTempFile::new().unwrap();
    let opts = DecodeOptions::default();

    // Arbitrary bytes are almost never a well-formed container; the only
    // contract under fuzzing is that a malformed header or table is
    // rejected with an error, never a panic.
    let _ = warp_core::decompress(packed.path(), restored.path(), &opts);
});
