//! Whole-file xxh64 hashing for the optional trailing checksum block.
//! Shared between the encoder (hashes the original input once) and the
//! decoder (hashes the freshly written output for end-to-end verification).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

pub fn xxh64_file(path: &Path) -> Result<u64> {
    let mut f = File::open(path)?;
    let mut hasher = xxhash_rust::xxh64::Xxh64::new(0);
    let mut buf = [0u8; 1 << 20];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.digest())
}
