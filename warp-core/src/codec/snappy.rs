use super::{AlgoTag, Codec};

pub struct SnappyCodec;

impl Codec for SnappyCodec {
    fn tag(&self) -> AlgoTag {
        AlgoTag::Snappy
    }

    fn bound(&self, src_len: usize) -> usize {
        snap::raw::max_compress_len(src_len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], _level: i32) -> usize {
        // Levelless codec; the level argument is ignored.
        let mut encoder = snap::raw::Encoder::new();
        encoder.compress(src, dst).unwrap_or(0)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> usize {
        let mut decoder = snap::raw::Decoder::new();
        decoder.decompress(src, dst).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let c = SnappyCodec;
        let src = b"the rain in spain falls mainly on the plain".repeat(8);
        let mut dst = vec![0u8; c.bound(src.len())];
        let written = c.compress(&src, &mut dst, 1);
        assert!(written > 0);
        let mut back = vec![0u8; src.len()];
        assert_eq!(c.decompress(&dst[..written], &mut back), src.len());
        assert_eq!(back, src);
    }
}
