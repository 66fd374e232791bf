//! Chunk-size policy: maps a total input size to a nominal chunk size.
//! Thresholds and sizes here are normative and must not drift — changing
//! them changes the chunk layout of every container written afterward.

const MIB: u64 = 1 << 20;

/// Returns the nominal chunk size for a given total input size, consulted
/// exactly once per encode unless the caller supplies an explicit override.
pub fn pick_chunk_size(total_bytes: u64) -> u32 {
    if total_bytes <= 256 * MIB {
        1 * MIB as u32
    } else if total_bytes <= 1024 * MIB {
        2 * MIB as u32
    } else if total_bytes <= 5 * 1024 * MIB {
        8 * MIB as u32
    } else if total_bytes <= 10 * 1024 * MIB {
        16 * MIB as u32
    } else if total_bytes <= 50 * 1024 * MIB {
        32 * MIB as u32
    } else if total_bytes <= 100 * 1024 * MIB {
        64 * MIB as u32
    } else if total_bytes <= 500 * 1024 * MIB {
        128 * MIB as u32
    } else {
        256 * MIB as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_pick_expected_sizes() {
        assert_eq!(pick_chunk_size(0), 1 * MIB as u32);
        assert_eq!(pick_chunk_size(256 * MIB), 1 * MIB as u32);
        assert_eq!(pick_chunk_size(256 * MIB + 1), 2 * MIB as u32);
        assert_eq!(pick_chunk_size(1024 * MIB), 2 * MIB as u32);
        assert_eq!(pick_chunk_size(1024 * MIB + 1), 8 * MIB as u32);
        assert_eq!(pick_chunk_size(5 * 1024 * MIB), 8 * MIB as u32);
        assert_eq!(pick_chunk_size(10 * 1024 * MIB), 16 * MIB as u32);
        assert_eq!(pick_chunk_size(50 * 1024 * MIB), 32 * MIB as u32);
        assert_eq!(pick_chunk_size(100 * 1024 * MIB), 64 * MIB as u32);
        assert_eq!(pick_chunk_size(500 * 1024 * MIB), 128 * MIB as u32);
        assert_eq!(pick_chunk_size(500 * 1024 * MIB + 1), 256 * MIB as u32);
    }

    #[test]
    fn chunk_count_ceil_division() {
        let chunk = pick_chunk_size(10);
        let total = 10u64;
        let n = (total + chunk as u64 - 1) / chunk as u64;
        assert_eq!(n, 1);
    }
}
