//! Encode pipeline: stat the input, size the chunk table, optionally warm
//! up to lock an algorithm, dispatch one worker job per chunk, then
//! serialize the container in index order.
//!
//! Workers only ever produce in-memory results; the single driver thread is
//! the only one that touches the output file, and it always writes in
//! ascending chunk-index order.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use crate::codec::{self, AlgoTag};
use crate::error::{Error, Result};
use crate::format::{self, ChunkEntry, Footer, Header};
use crate::io;
use crate::options::{AutoMode, ChkKind, EncodeOptions, EncodeReport};
use crate::pool::BufferPool;
use crate::workers::WorkerPool;
use crate::zerocheck::is_all_zero;

struct ChunkTrial {
    algo: AlgoTag,
    mbps: f64,
    ratio: f64,
}

struct ChunkResult {
    final_algo: AlgoTag,
    final_len: u32,
    orig_len: u32,
    payload: Option<Vec<u8>>,
    trial: Option<ChunkTrial>,
}

pub fn compress_file(input: &Path, output: &Path, opts: &EncodeOptions) -> Result<EncodeReport> {
    let in_file = File::open(input).map_err(|_| Error::InputMissing)?;
    let orig_size = in_file.metadata()?.len();
    if orig_size == 0 {
        return Err(Error::InputMissing);
    }

    let chunk_size = if opts.chunk_bytes != 0 {
        opts.chunk_bytes
    } else {
        crate::chunking::pick_chunk_size(orig_size)
    };
    let chunk_count = ((orig_size + chunk_size as u64 - 1) / chunk_size as u64) as u32;

    let out_file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .map_err(|e| Error::OutputIo(e.to_string()))?;

    let table_off = format::HEADER_SIZE;
    let payload_off = table_off + chunk_count as u64 * format::CHUNK_ENTRY_SIZE;
    io::presize(&out_file, payload_off);

    let thread_count = opts.threads.max(1);
    let workers = WorkerPool::new(thread_count)?;
    let in_pool = BufferPool::new(chunk_size as usize, thread_count * 2);
    let out_pool = BufferPool::new(codec::max_bound(chunk_size as usize), thread_count * 2);

    let mut table = vec![ChunkEntry::default(); chunk_count as usize];
    let mut cursor = payload_off;

    let warm_n = match opts.algo {
        Some(_) => 0,
        None => opts.auto_lock.min(chunk_count as usize),
    };

    let mut locked_algo = opts.algo.unwrap_or(AlgoTag::Zstd);

    if warm_n > 0 {
        let real_tags = [AlgoTag::Zstd, AlgoTag::Lz4, AlgoTag::Snappy];
        let results: Vec<Result<ChunkResult>> = workers.map_barrier(warm_n, |i| {
            let offset = i as u64 * chunk_size as u64;
            let len = chunk_len(i as u32, chunk_count, chunk_size, orig_size);
            encode_chunk(
                &in_file,
                offset,
                len,
                &real_tags,
                opts.level,
                opts.auto_mode,
                &in_pool,
                &out_pool,
                i as u32,
            )
        });

        let mut trials = Vec::with_capacity(warm_n);
        for (i, result) in results.into_iter().enumerate() {
            let job = result?;
            write_chunk(&out_file, &mut table, &mut cursor, i as u32, &job)?;
            trials.push(job.trial);
        }

        if let Some(algo) = pick_locked_algo(&trials, opts.auto_mode) {
            locked_algo = algo;
        }
    }

    let remaining = chunk_count as usize - warm_n;
    if remaining > 0 {
        let pinned = [locked_algo];
        let results: Vec<Result<ChunkResult>> = workers.map_barrier(remaining, |j| {
            let i = warm_n + j;
            let offset = i as u64 * chunk_size as u64;
            let len = chunk_len(i as u32, chunk_count, chunk_size, orig_size);
            encode_chunk(
                &in_file,
                offset,
                len,
                &pinned,
                opts.level,
                opts.auto_mode,
                &in_pool,
                &out_pool,
                i as u32,
            )
        });

        for (j, result) in results.into_iter().enumerate() {
            let i = warm_n + j;
            let job = result?;
            write_chunk(&out_file, &mut table, &mut cursor, i as u32, &job)?;
        }
    }

    let comp_size = cursor - payload_off;

    let mut table_buf = Vec::new();
    format::write_table(&mut table_buf, &table)?;
    io::write_all_at(&out_file, &table_buf, table_off)?;

    let mut flags = 0u8;
    let mut footer = Footer::default();

    if opts.do_index {
        let mut idx_buf = Vec::new();
        format::write_index(&mut idx_buf, &table)?;
        footer.wix_off = cursor;
        io::write_all_at(&out_file, &idx_buf, cursor)?;
        cursor += idx_buf.len() as u64;
        flags |= format::FLAG_INDEX;
    }

    let mut wrote_checksum = false;
    if opts.chk_kind == ChkKind::Xxh64 {
        match crate::checksum::xxh64_file(input) {
            Ok(digest) => {
                let mut chk_buf = Vec::new();
                format::write_checksum(&mut chk_buf, format::CHK_XXH64, &digest.to_le_bytes())?;
                footer.chk_off = cursor;
                io::write_all_at(&out_file, &chk_buf, cursor)?;
                cursor += chk_buf.len() as u64;
                flags |= format::FLAG_CHECKSUM;
                wrote_checksum = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "checksum computation failed, writing container without one");
            }
        }
    }

    let mut footer_buf = Vec::new();
    footer.write(&mut footer_buf)?;
    io::write_all_at(&out_file, &footer_buf, cursor)?;

    let header = Header {
        base_algo: locked_algo.as_u8(),
        flags,
        chunk_size,
        chunk_count,
        orig_size,
        comp_size,
    };
    let mut hdr_buf = Vec::new();
    header.write(&mut hdr_buf)?;
    io::write_all_at(&out_file, &hdr_buf, 0)?;

    Ok(EncodeReport {
        chunk_count,
        orig_size,
        comp_size,
        base_algo: locked_algo,
        wrote_index: opts.do_index,
        wrote_checksum,
    })
}

fn chunk_len(index: u32, chunk_count: u32, chunk_size: u32, orig_size: u64) -> u32 {
    if index + 1 == chunk_count {
        (orig_size - index as u64 * chunk_size as u64) as u32
    } else {
        chunk_size
    }
}

fn write_chunk(
    out_file: &File,
    table: &mut [ChunkEntry],
    cursor: &mut u64,
    index: u32,
    job: &ChunkResult,
) -> Result<()> {
    let offset = *cursor;
    if let Some(payload) = &job.payload {
        io::write_all_at(out_file, payload, offset)?;
        *cursor += payload.len() as u64;
    }
    table[index as usize] = ChunkEntry {
        offset,
        orig_len: job.orig_len,
        comp_len: job.final_len,
        algo: job.final_algo.as_u8(),
    };
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn encode_chunk(
    file: &File,
    offset: u64,
    len: u32,
    candidates: &[AlgoTag],
    level: i32,
    auto_mode: AutoMode,
    in_pool: &BufferPool,
    out_pool: &BufferPool,
    index: u32,
) -> Result<ChunkResult> {
    let mut in_buf = in_pool.acquire()?;
    io::read_exact_at(file, &mut in_buf[..len as usize], offset)
        .map_err(|_| Error::ChunkEncodeFailed { index })?;
    let data = &in_buf[..len as usize];

    if is_all_zero(data) {
        return Ok(ChunkResult {
            final_algo: AlgoTag::Zero,
            final_len: 0,
            orig_len: len,
            payload: None,
            trial: None,
        });
    }

    let mut best: Option<(AlgoTag, usize, f64, f64)> = None;
    let mut best_payload: Vec<u8> = Vec::new();

    for &tag in candidates {
        let codec = codec::codec_for(tag)?;
        let mut out_buf = out_pool.acquire()?;
        let start = Instant::now();
        let written = codec.compress(data, &mut out_buf, level);
        let secs = start.elapsed().as_secs_f64().max(1e-9);
        if written == 0 {
            continue;
        }
        let mbps = (len as f64 / (1024.0 * 1024.0)) / secs;
        let ratio = written as f64 / len as f64;
        let score = score_for(auto_mode, mbps, ratio);
        let better = match best {
            None => true,
            Some((_, _, cur_mbps, cur_ratio)) => score > score_for(auto_mode, cur_mbps, cur_ratio),
        };
        if better {
            best = Some((tag, written, mbps, ratio));
            best_payload = out_buf[..written].to_vec();
        }
    }

    match best {
        None => Ok(ChunkResult {
            final_algo: AlgoTag::Copy,
            final_len: len,
            orig_len: len,
            payload: Some(data.to_vec()),
            trial: None,
        }),
        Some((tag, written, mbps, ratio)) => {
            let trial = Some(ChunkTrial { algo: tag, mbps, ratio });
            let negligible_savings = (written as u64) >= (len as u64 - len as u64 / 64);
            if negligible_savings {
                Ok(ChunkResult {
                    final_algo: AlgoTag::Copy,
                    final_len: len,
                    orig_len: len,
                    payload: Some(data.to_vec()),
                    trial,
                })
            } else {
                Ok(ChunkResult {
                    final_algo: tag,
                    final_len: written as u32,
                    orig_len: len,
                    payload: Some(best_payload),
                    trial,
                })
            }
        }
    }
}

/// Higher is better, for all three `auto_mode` variants. `ratio` is
/// compressed/original (smaller is better compression).
fn score_for(mode: AutoMode, mbps: f64, ratio: f64) -> f64 {
    match mode {
        AutoMode::Throughput => mbps,
        AutoMode::Ratio => (1.0 - ratio) * 1000.0,
        AutoMode::Balanced => mbps * (1.0 + 3.0 * (1.0 - ratio)),
    }
}

fn pick_locked_algo(trials: &[Option<ChunkTrial>], mode: AutoMode) -> Option<AlgoTag> {
    let mut best: Option<(AlgoTag, f64)> = None;
    for codec in codec::real_candidates() {
        let tag = codec.tag();
        let samples: Vec<&ChunkTrial> = trials
            .iter()
            .filter_map(|t| t.as_ref())
            .filter(|t| t.algo == tag)
            .collect();
        if samples.is_empty() {
            continue;
        }
        let mean_mbps = samples.iter().map(|s| s.mbps).sum::<f64>() / samples.len() as f64;
        let mean_ratio = samples.iter().map(|s| s.ratio).sum::<f64>() / samples.len() as f64;
        let score = score_for(mode, mean_mbps, mean_ratio);
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((tag, score));
        }
    }
    best.map(|(tag, _)| tag)
}
