use super::{AlgoTag, Codec};

/// Synthetic verbatim codec: the encoder's fallback when a real codec fails
/// or saves less than ~1.5% of the chunk's size.
pub struct CopyCodec;

impl Codec for CopyCodec {
    fn tag(&self) -> AlgoTag {
        AlgoTag::Copy
    }

    fn bound(&self, src_len: usize) -> usize {
        src_len
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], _level: i32) -> usize {
        if dst.len() < src.len() {
            return 0;
        }
        dst[..src.len()].copy_from_slice(src);
        src.len()
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> usize {
        if dst.len() < src.len() {
            return 0;
        }
        dst[..src.len()].copy_from_slice(src);
        src.len()
    }
}
