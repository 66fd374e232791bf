//! Core container format, codec registry, buffer/worker pools, and parallel
//! encode/decode pipelines for the `.warp` chunked, random-access
//! compression container.
//!
//! The CLI binary is a thin shell over [`compress`] and [`decompress`]; all
//! format and concurrency logic lives here so it can be exercised directly
//! from tests without spawning a process.

pub mod checksum;
pub mod chunking;
pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod io;
pub mod options;
pub mod pool;
pub mod workers;
mod zerocheck;

pub use codec::AlgoTag;
pub use error::{Error, Result};
pub use options::{AutoMode, ChkKind, DecodeOptions, DecodeReport, EncodeOptions, EncodeReport};

use std::path::Path;

/// Compresses `input` into the `.warp` container `output`.
pub fn compress(input: &Path, output: &Path, opts: &EncodeOptions) -> Result<EncodeReport> {
    encode::compress_file(input, output, opts)
}

/// Decompresses the `.warp` container `input` back into `output`.
pub fn decompress(input: &Path, output: &Path, opts: &DecodeOptions) -> Result<DecodeReport> {
    decode::decompress_file(input, output, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn compress_then_decompress_round_trips_default_options() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        input.write_all(&data).unwrap();
        input.flush().unwrap();

        let packed = tempfile::NamedTempFile::new().unwrap();
        let mut eopts = EncodeOptions::default();
        eopts.chunk_bytes = 4096;
        let ereport = compress(input.path(), packed.path(), &eopts).unwrap();
        assert_eq!(ereport.orig_size, data.len() as u64);

        let restored = tempfile::NamedTempFile::new().unwrap();
        let dopts = DecodeOptions::default();
        let dreport = decompress(packed.path(), restored.path(), &dopts).unwrap();
        assert_eq!(dreport.orig_size, data.len() as u64);
        assert_eq!(std::fs::read(restored.path()).unwrap(), data);
    }
}
