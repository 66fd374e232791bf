//! CLI-facing option records, shared by the encode and decode pipelines.

use crate::codec::AlgoTag;

/// Warm-up scoring policy: which axis (throughput, ratio, or a blend of
/// both) the encoder optimizes for when picking a locked algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoMode {
    Throughput,
    Balanced,
    Ratio,
}

/// Optional trailing checksum kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChkKind {
    None,
    Xxh64,
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub threads: usize,
    pub level: i32,
    /// `None` selects auto mode (warm-up then lock); `Some(tag)` pins a
    /// single codec end to end and skips warm-up entirely.
    pub algo: Option<AlgoTag>,
    /// `0` consults the chunk-size policy; any other value overrides it.
    pub chunk_bytes: u32,
    pub auto_mode: AutoMode,
    pub auto_lock: usize,
    pub do_index: bool,
    pub chk_kind: ChkKind,
    pub verbose: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            threads: 1,
            level: 1,
            algo: None,
            chunk_bytes: 0,
            auto_mode: AutoMode::Balanced,
            auto_lock: 4,
            do_index: true,
            chk_kind: ChkKind::None,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub threads: usize,
    pub verify: bool,
    pub verbose: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            threads: 1,
            verify: false,
            verbose: false,
        }
    }
}

/// Summary returned to the caller after a successful encode, useful for
/// CLI reporting and for tests that assert on the locked algorithm.
#[derive(Debug, Clone)]
pub struct EncodeReport {
    pub chunk_count: u32,
    pub orig_size: u64,
    pub comp_size: u64,
    pub base_algo: AlgoTag,
    pub wrote_index: bool,
    pub wrote_checksum: bool,
}

/// Summary returned to the caller after a successful decode.
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub chunk_count: u32,
    pub orig_size: u64,
    pub checksum_verified: Option<bool>,
}
