//! Decode pipeline: read and validate the header and chunk table, pre-size
//! the output, dispatch one worker job per chunk, then write the decoded
//! chunks to the output file in strict chunk-index order and optionally
//! verify the trailing checksum block while doing so.
//!
//! Workers only ever produce in-memory buffers; the single driver thread is
//! the only one that touches the output file, writing in ascending
//! chunk-index order, mirroring the encode pipeline.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::codec::{self, AlgoTag};
use crate::error::{Error, Result};
use crate::format::{self, ChunkEntry, Header};
use crate::io;
use crate::options::{DecodeOptions, DecodeReport};
use crate::pool::{BufferPool, PooledBuf};
use crate::workers::WorkerPool;

/// One chunk's decoded bytes, still pool-owned; the driver writes `len`
/// bytes of `buf` at this chunk's output offset after the barrier.
struct DecodedChunk {
    buf: PooledBuf,
    len: u32,
}

pub fn decompress_file(input: &Path, output: &Path, opts: &DecodeOptions) -> Result<DecodeReport> {
    let meta_file = File::open(input).map_err(|_| Error::InputMissing)?;
    let total_len = meta_file.metadata()?.len();
    let mut header_reader = BufReader::new(meta_file);
    let header = Header::read(&mut header_reader)?;
    let remaining_for_table = total_len.saturating_sub(format::HEADER_SIZE);
    let table = format::read_table(&mut header_reader, header.chunk_count, remaining_for_table)?;
    drop(header_reader);

    let data_file = File::open(input)?;
    let out_file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .map_err(|e| Error::OutputIo(e.to_string()))?;
    io::presize(&out_file, header.orig_size);

    let thread_count = opts.threads.max(1);
    let workers = WorkerPool::new(thread_count)?;
    let comp_pool = BufferPool::new(codec::max_bound(header.chunk_size as usize), thread_count * 2);
    let plain_pool = BufferPool::new(header.chunk_size as usize, thread_count * 2);

    let n = header.chunk_count as usize;
    let results: Vec<Result<DecodedChunk>> = workers.map_barrier(n, |i| {
        decode_chunk(&data_file, &table[i], i as u32, &comp_pool, &plain_pool)
    });

    let stored_digest = read_stored_digest(input, &header)?;
    let mut hasher = stored_digest.map(|_| xxhash_rust::xxh64::Xxh64::new(0));

    for (i, r) in results.into_iter().enumerate() {
        let chunk = r?;
        let out_offset = i as u64 * header.chunk_size as u64;
        let slice = &chunk.buf[..chunk.len as usize];
        io::write_all_at(&out_file, slice, out_offset)
            .map_err(|_| Error::ChunkDecodeFailed { index: i as u32 })?;
        if let Some(h) = hasher.as_mut() {
            h.update(slice);
        }
    }

    let checksum_verified = match (stored_digest, hasher) {
        (Some(stored), Some(h)) => {
            let actual = h.digest();
            let matches = actual == stored;
            if !matches {
                tracing::warn!(
                    "checksum mismatch: decoded output does not match the stored digest"
                );
                if opts.verify {
                    return Err(Error::ChecksumMismatch);
                }
            }
            Some(matches)
        }
        _ => None,
    };

    Ok(DecodeReport {
        chunk_count: header.chunk_count,
        orig_size: header.orig_size,
        checksum_verified,
    })
}

/// Decodes one chunk into a pool-owned output buffer. Never touches the
/// output file — the driver writes `DecodedChunk`s back in chunk-index
/// order after the barrier, per the ordering guarantee in spec section 5.
fn decode_chunk(
    in_file: &File,
    entry: &ChunkEntry,
    index: u32,
    comp_pool: &BufferPool,
    plain_pool: &BufferPool,
) -> Result<DecodedChunk> {
    let algo = entry
        .algo_tag()
        .map_err(|_| Error::ChunkDecodeFailed { index })?;

    let mut plain_buf = plain_pool
        .acquire()
        .map_err(|_| Error::ChunkDecodeFailed { index })?;
    if entry.orig_len as usize > plain_buf.len() {
        return Err(Error::ChunkDecodeFailed { index });
    }

    if algo == AlgoTag::Zero {
        plain_buf[..entry.orig_len as usize].fill(0);
        return Ok(DecodedChunk {
            buf: plain_buf,
            len: entry.orig_len,
        });
    }

    let mut comp_buf = comp_pool
        .acquire()
        .map_err(|_| Error::ChunkDecodeFailed { index })?;
    if entry.comp_len as usize > comp_buf.len() {
        return Err(Error::ChunkDecodeFailed { index });
    }
    io::read_exact_at(in_file, &mut comp_buf[..entry.comp_len as usize], entry.offset)
        .map_err(|_| Error::ChunkDecodeFailed { index })?;

    let codec = codec::codec_for(algo).map_err(|_| Error::ChunkDecodeFailed { index })?;
    let written = codec.decompress(
        &comp_buf[..entry.comp_len as usize],
        &mut plain_buf[..entry.orig_len as usize],
    );
    if written != entry.orig_len as usize {
        return Err(Error::ChunkDecodeFailed { index });
    }
    Ok(DecodedChunk {
        buf: plain_buf,
        len: entry.orig_len,
    })
}

/// Reads the trailing footer and, if a checksum block is present, returns
/// its stored digest. Bounds-checks the block's claimed digest length
/// against the file's actual remaining bytes before any allocation. Absence
/// of an index/checksum, or a truncated footer, is not an error here — it
/// just means no checksum was requested or available.
fn read_stored_digest(input: &Path, header: &Header) -> Result<Option<u64>> {
    if header.flags & format::FLAG_CHECKSUM == 0 {
        return Ok(None);
    }
    let mut footer_file = File::open(input)?;
    let total_len = footer_file.metadata()?.len();
    let footer = match format::read_footer_from_end(&mut footer_file) {
        Ok(f) => f,
        Err(_) => return Ok(None),
    };
    if footer.chk_off == 0 || footer.chk_off > total_len {
        return Ok(None);
    }

    let mut f = File::open(input)?;
    f.seek(SeekFrom::Start(footer.chk_off))?;
    // read_checksum consumes 20 fixed bytes (magic+kind+dlen+_rsv) itself;
    // whatever remains in the file past that is all the digest may claim.
    let remaining = total_len.saturating_sub(footer.chk_off + 20);
    let block = format::read_checksum(&mut f, remaining)?;
    if block.kind != format::CHK_XXH64 || block.digest.len() != 8 {
        return Ok(None);
    }

    Ok(Some(u64::from_le_bytes(block.digest[..8].try_into().unwrap())))
}
