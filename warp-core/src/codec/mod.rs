//! Codec registry: a uniform `bound`/`compress`/`decompress` contract over
//! zstd, lz4, snappy, plus the two synthetic algorithms (copy, zero).
//!
//! Dispatch is a small fixed table keyed by the on-disk tag, not a
//! process-global registry, so there's no initialization-order hazard and
//! no runtime registration step to get wrong.

mod copy;
mod lz4;
mod snappy;
mod zstd_codec;

use crate::error::{Error, Result};

/// On-disk algorithm tags. Values are pinned and MUST NOT change across
/// builds — they're read back from containers written by older versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlgoTag {
    Zstd = 1,
    Lz4 = 2,
    Snappy = 3,
    Copy = 4,
    Zero = 5,
}

impl AlgoTag {
    pub fn from_u8(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(AlgoTag::Zstd),
            2 => Ok(AlgoTag::Lz4),
            3 => Ok(AlgoTag::Snappy),
            4 => Ok(AlgoTag::Copy),
            5 => Ok(AlgoTag::Zero),
            other => Err(Error::CodecUnavailable { tag: other }),
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            AlgoTag::Zstd => "zstd",
            AlgoTag::Lz4 => "lz4",
            AlgoTag::Snappy => "snappy",
            AlgoTag::Copy => "copy",
            AlgoTag::Zero => "zero",
        }
    }
}

/// A real, selectable compression codec. `Zero` is never a candidate here —
/// it is produced by the encoder's zero-block detector and consumed directly
/// by the decoder, never looked up through this trait.
pub trait Codec: Send + Sync {
    fn tag(&self) -> AlgoTag;

    /// Upper bound on the encoded size of `src_len` input bytes.
    fn bound(&self, src_len: usize) -> usize;

    /// Compresses `src` into `dst`. Returns the number of bytes written, or
    /// `0` to signal failure (caller falls back to COPY).
    fn compress(&self, src: &[u8], dst: &mut [u8], level: i32) -> usize;

    /// Decompresses `src` into `dst`, which must be exactly `orig_len` bytes.
    /// Returns the number of bytes written, or `0` to signal failure.
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> usize;
}

/// Looks up the codec implementation for a given tag. `Zero` has no codec
/// object — callers must special-case it before reaching this function.
pub fn codec_for(tag: AlgoTag) -> Result<&'static dyn Codec> {
    match tag {
        AlgoTag::Zstd => Ok(&zstd_codec::ZstdCodec),
        AlgoTag::Lz4 => Ok(&lz4::Lz4Codec),
        AlgoTag::Snappy => Ok(&snappy::SnappyCodec),
        AlgoTag::Copy => Ok(&copy::CopyCodec),
        AlgoTag::Zero => Err(Error::CodecUnavailable {
            tag: AlgoTag::Zero.as_u8(),
        }),
    }
}

/// The three real, warm-up-eligible candidates, in tie-break order:
/// zstd < lz4 < snappy. A scoring tie during warm-up keeps whichever
/// candidate appears first in this list.
pub fn real_candidates() -> [&'static dyn Codec; 3] {
    [&zstd_codec::ZstdCodec, &lz4::Lz4Codec, &snappy::SnappyCodec]
}

/// Upper bound across all real codecs plus the chunk size itself, used to
/// size the shared output buffer pool.
pub fn max_bound(chunk_size: usize) -> usize {
    real_candidates()
        .iter()
        .map(|c| c.bound(chunk_size))
        .fold(chunk_size, std::cmp::max)
}
