use super::{AlgoTag, Codec};

pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn tag(&self) -> AlgoTag {
        AlgoTag::Zstd
    }

    fn bound(&self, src_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(src_len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8], level: i32) -> usize {
        zstd::bulk::compress_to_buffer(src, dst, level)
            .unwrap_or(0)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> usize {
        zstd::bulk::decompress_to_buffer(src, dst).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_is_at_least_src_len() {
        let c = ZstdCodec;
        assert!(c.bound(1024) >= 1024);
    }

    #[test]
    fn compress_failure_reports_zero() {
        let c = ZstdCodec;
        let src = vec![7u8; 1024];
        let mut tiny = [0u8; 1];
        assert_eq!(c.compress(&src, &mut tiny, 1), 0);
    }
}
