//! Error taxonomy shared by the encode and decode pipelines. Each kind is
//! surfaced as soon as the driver can attribute it to a concrete cause (a
//! missing input, a bad header, a single failed chunk). Workers never
//! retry; the driver collects the first failure at the barrier and fails
//! fast.

use thiserror::Error;

/// Library-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file is missing or empty")]
    InputMissing,

    #[error("failed to create or size the output file: {0}")]
    OutputIo(String),

    #[error("bad container header: {0}")]
    BadHeader(String),

    #[error("bad chunk table: {0}")]
    BadTable(String),

    #[error("chunk {index} failed to encode")]
    ChunkEncodeFailed { index: u32 },

    #[error("chunk {index} failed to decode")]
    ChunkDecodeFailed { index: u32 },

    #[error("codec tag {tag} is not available in this build")]
    CodecUnavailable { tag: u8 },

    #[error("checksum mismatch: stored digest does not match decoded data")]
    ChecksumMismatch,

    #[error("buffer pool exhausted (internal invariant violated)")]
    PoolExhausted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
