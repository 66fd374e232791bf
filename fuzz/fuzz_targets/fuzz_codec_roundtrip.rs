#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use warp_core::AlgoTag;

#[derive(Arbitrary, Debug)]
enum FuzzAlgo {
    Zstd,
    Lz4,
    Snappy,
}

impl From<FuzzAlgo> for AlgoTag {
    fn from(a: FuzzAlgo) -> Self {
        match a {
            FuzzAlgo::Zstd => AlgoTag::Zstd,
            FuzzAlgo::Lz4 => AlgoTag::Lz4,
            FuzzAlgo::Snappy => AlgoTag::Snappy,
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    algo: FuzzAlgo,
    data: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    if input.data.len() > 1_000_000 {
        return;
    }

    let codec = warp_core::codec::codec_for(input.algo.into()).unwrap();

    let mut comp = vec![0u8; codec.bound(input.data.len())];
    let comp_len = codec.compress(&input.data, &mut comp, 1);
    if comp_len == 0 {
        // Codecs may signal failure; the encoder falls back to copy.
        return;
    }

    let mut back = vec![0u8; input.data.len()];
    let written = codec.decompress(&comp[..comp_len], &mut back);
    assert_eq!(written, input.data.len());
    assert_eq!(back, input.data);
});
