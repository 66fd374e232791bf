use super::{AlgoTag, Codec};

pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn tag(&self) -> AlgoTag {
        AlgoTag::Lz4
    }

    fn bound(&self, src_len: usize) -> usize {
        lz4_flex::block::get_maximum_output_size(src_len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], _level: i32) -> usize {
        // lz4_flex has no meaningful "level" knob in block mode; the level
        // argument is accepted for trait uniformity and ignored.
        lz4_flex::block::compress_into(src, dst).unwrap_or(0)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> usize {
        lz4_flex::block::decompress_into(src, dst).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let c = Lz4Codec;
        let src = b"abcdabcdabcdabcdabcdabcdabcdabcd".repeat(16);
        let mut dst = vec![0u8; c.bound(src.len())];
        let written = c.compress(&src, &mut dst, 1);
        assert!(written > 0);
        let mut back = vec![0u8; src.len()];
        assert_eq!(c.decompress(&dst[..written], &mut back), src.len());
        assert_eq!(back, src);
    }

    #[test]
    fn dst_too_small_reports_zero() {
        let c = Lz4Codec;
        let src = vec![9u8; 4096];
        let mut dst = [0u8; 1];
        assert_eq!(c.compress(&src, &mut dst, 1), 0);
    }
}
