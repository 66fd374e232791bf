//! All-zero detection for the encoder's zero-block fast path: a chunk made
//! entirely of `0x00` bytes is recorded with `comp_len = 0` and no payload
//! at all, skipping every real codec trial.

/// Returns `true` if every byte in `data` is zero. Scans a word at a time
/// with a tail remainder for lengths not divisible by 8.
pub fn is_all_zero(data: &[u8]) -> bool {
    let chunks = data.chunks_exact(8);
    let tail = chunks.remainder();
    for word in chunks {
        let w: [u8; 8] = word.try_into().unwrap();
        if u64::from_ne_bytes(w) != 0 {
            return false;
        }
    }
    tail.iter().all(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_all_zero() {
        assert!(is_all_zero(&[]));
    }

    #[test]
    fn all_zero_detected_across_sizes() {
        for len in [0, 1, 7, 8, 9, 1023, 1024, 1025] {
            assert!(is_all_zero(&vec![0u8; len]), "len {len}");
        }
    }

    #[test]
    fn single_nonzero_byte_anywhere_fails() {
        for pos in [0usize, 3, 8, 15, 100] {
            let mut buf = vec![0u8; 200];
            buf[pos] = 1;
            assert!(!is_all_zero(&buf), "pos {pos}");
        }
    }
}
