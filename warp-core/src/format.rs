//! Bit-exact container serializer. All multi-byte integers are
//! little-endian; every struct below has an explicit, padded width so the
//! on-disk layout is stable across platforms and implementations. Field
//! widths and magic values here are normative and must not drift once
//! written containers exist in the wild.

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{self, Read, Write};

use crate::codec::AlgoTag;
use crate::error::{Error, Result};

pub const WARP_MAGIC: u32 = 0x5052_4157;
pub const WARP_VERSION: u16 = 1;
pub const WIX_MAGIC: u32 = 0x3158_4957;
pub const WCHK_MAGIC: u32 = 0x4B48_4357;
pub const WFTR_MAGIC: u32 = 0x5254_4657;

pub const HEADER_SIZE: u64 = 32;
pub const CHUNK_ENTRY_SIZE: u64 = 24;
pub const INDEX_ENTRY_SIZE: u64 = 24;
pub const FOOTER_SIZE: u64 = 24;

pub const CHK_NONE: u32 = 0;
pub const CHK_XXH64: u32 = 1;

/// `Header::flags` bit indicating an index block is present.
pub const FLAG_INDEX: u8 = 0x01;
/// `Header::flags` bit indicating a checksum block is present.
pub const FLAG_CHECKSUM: u8 = 0x02;

/// 32-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub base_algo: u8,
    pub flags: u8,
    pub chunk_size: u32,
    pub chunk_count: u32,
    pub orig_size: u64,
    pub comp_size: u64,
}

impl Header {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u32::<LE>(WARP_MAGIC)?;
        w.write_u16::<LE>(WARP_VERSION)?;
        w.write_u8(self.base_algo)?;
        w.write_u8(self.flags)?;
        w.write_u32::<LE>(self.chunk_size)?;
        w.write_u32::<LE>(self.chunk_count)?;
        w.write_u64::<LE>(self.orig_size)?;
        w.write_u64::<LE>(self.comp_size)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let magic = r
            .read_u32::<LE>()
            .map_err(|e| Error::BadHeader(format!("truncated header: {e}")))?;
        if magic != WARP_MAGIC {
            return Err(Error::BadHeader(format!(
                "bad magic: expected {WARP_MAGIC:#010x}, got {magic:#010x}"
            )));
        }
        let version = r
            .read_u16::<LE>()
            .map_err(|e| Error::BadHeader(format!("truncated header: {e}")))?;
        if version != WARP_VERSION {
            return Err(Error::BadHeader(format!(
                "unsupported version {version}, expected {WARP_VERSION}"
            )));
        }
        let base_algo = r.read_u8()?;
        let flags = r.read_u8()?;
        let chunk_size = r.read_u32::<LE>()?;
        let chunk_count = r.read_u32::<LE>()?;
        let orig_size = r.read_u64::<LE>()?;
        let comp_size = r.read_u64::<LE>()?;
        Ok(Header {
            base_algo,
            flags,
            chunk_size,
            chunk_count,
            orig_size,
            comp_size,
        })
    }
}

/// One 24-byte chunk-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkEntry {
    pub offset: u64,
    pub orig_len: u32,
    pub comp_len: u32,
    pub algo: u8,
}

impl ChunkEntry {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u64::<LE>(self.offset)?;
        w.write_u32::<LE>(self.orig_len)?;
        w.write_u32::<LE>(self.comp_len)?;
        w.write_u8(self.algo)?;
        w.write_all(&[0u8; 7])?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let offset = r.read_u64::<LE>()?;
        let orig_len = r.read_u32::<LE>()?;
        let comp_len = r.read_u32::<LE>()?;
        let algo = r.read_u8()?;
        let mut pad = [0u8; 7];
        r.read_exact(&mut pad)?;
        Ok(ChunkEntry {
            offset,
            orig_len,
            comp_len,
            algo,
        })
    }

    pub fn algo_tag(&self) -> Result<AlgoTag> {
        AlgoTag::from_u8(self.algo)
    }
}

pub fn write_table<W: Write>(w: &mut W, table: &[ChunkEntry]) -> Result<()> {
    for entry in table {
        entry.write(w)?;
    }
    Ok(())
}

/// Reads `count` chunk-table entries. `count` comes straight from an
/// untrusted header, so it is bounds-checked against `remaining_len` (the
/// number of bytes actually left in the file after the header) before any
/// allocation happens — a crafted `count` near `u32::MAX` must fail with
/// `BadTable`, not abort the process trying to reserve it.
pub fn read_table<R: Read>(r: &mut R, count: u32, remaining_len: u64) -> Result<Vec<ChunkEntry>> {
    let needed = count as u64 * CHUNK_ENTRY_SIZE;
    if needed > remaining_len {
        return Err(Error::BadTable(format!(
            "chunk table claims {count} entries ({needed} bytes) but only {remaining_len} bytes remain"
        )));
    }
    let mut table = Vec::with_capacity(count as usize);
    for i in 0..count {
        let entry = ChunkEntry::read(r)
            .map_err(|e| Error::BadTable(format!("entry {i}: {e}")))?;
        table.push(entry);
    }
    Ok(table)
}

/// Optional index block: a redundant copy of the chunk table written near
/// the end of the file for random access without re-reading the header.
pub fn write_index<W: Write>(w: &mut W, table: &[ChunkEntry]) -> Result<()> {
    w.write_u32::<LE>(WIX_MAGIC)?;
    w.write_u32::<LE>(table.len() as u32)?;
    for entry in table {
        w.write_u64::<LE>(entry.offset)?;
        w.write_u32::<LE>(entry.orig_len)?;
        w.write_u32::<LE>(entry.comp_len)?;
        w.write_u8(entry.algo)?;
        w.write_all(&[0u8; 7])?;
    }
    w.write_u32::<LE>(0)?; // trailing_crc, reserved
    Ok(())
}

/// Reads the index block. `remaining_len` is the number of bytes left in the
/// file after the block's own `magic`+`count` fields, used to reject a
/// corrupt or hostile `count` before it drives an allocation.
pub fn read_index<R: Read>(r: &mut R, remaining_len: u64) -> Result<Vec<ChunkEntry>> {
    let magic = r.read_u32::<LE>()?;
    if magic != WIX_MAGIC {
        return Err(Error::BadTable(format!(
            "bad index magic: {magic:#010x}"
        )));
    }
    let count = r.read_u32::<LE>()?;
    let needed = count as u64 * INDEX_ENTRY_SIZE + 4; // + trailing_crc
    if needed > remaining_len {
        return Err(Error::BadTable(format!(
            "index block claims {count} entries ({needed} bytes) but only {remaining_len} bytes remain"
        )));
    }
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = r.read_u64::<LE>()?;
        let orig_len = r.read_u32::<LE>()?;
        let comp_len = r.read_u32::<LE>()?;
        let algo = r.read_u8()?;
        let mut pad = [0u8; 7];
        r.read_exact(&mut pad)?;
        entries.push(ChunkEntry {
            offset,
            orig_len,
            comp_len,
            algo,
        });
    }
    let _trailing_crc = r.read_u32::<LE>()?;
    Ok(entries)
}

/// Optional checksum block: a tagged digest (currently only xxh64).
pub fn write_checksum<W: Write>(w: &mut W, kind: u32, digest: &[u8]) -> Result<()> {
    w.write_u32::<LE>(WCHK_MAGIC)?;
    w.write_u32::<LE>(kind)?;
    w.write_u32::<LE>(digest.len() as u32)?;
    w.write_u32::<LE>(0)?;
    w.write_u32::<LE>(0)?;
    w.write_all(digest)?;
    Ok(())
}

pub struct ChecksumBlock {
    pub kind: u32,
    pub digest: Vec<u8>,
}

/// Reads the checksum block. `remaining_len` is the number of bytes left in
/// the file after the block's fixed `magic`+`kind`+`dlen`+`_rsv` fields; an
/// untrusted `dlen` that would read past it is rejected as `BadHeader`
/// before the digest buffer is allocated.
pub fn read_checksum<R: Read>(r: &mut R, remaining_len: u64) -> Result<ChecksumBlock> {
    let magic = r.read_u32::<LE>()?;
    if magic != WCHK_MAGIC {
        return Err(Error::BadHeader(format!(
            "bad checksum block magic: {magic:#010x}"
        )));
    }
    let kind = r.read_u32::<LE>()?;
    let dlen = r.read_u32::<LE>()?;
    let mut rsv = [0u8; 8];
    r.read_exact(&mut rsv)?;
    if dlen as u64 > remaining_len {
        return Err(Error::BadHeader(format!(
            "checksum block claims a {dlen}-byte digest but only {remaining_len} bytes remain"
        )));
    }
    let mut digest = vec![0u8; dlen as usize];
    r.read_exact(&mut digest)?;
    Ok(ChecksumBlock { kind, digest })
}

/// Fixed 24-byte trailing footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Footer {
    pub wix_off: u64,
    pub chk_off: u64,
}

impl Footer {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_u32::<LE>(WFTR_MAGIC)?;
        w.write_u32::<LE>(0)?;
        w.write_u64::<LE>(self.wix_off)?;
        w.write_u64::<LE>(self.chk_off)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let magic = r.read_u32::<LE>()?;
        if magic != WFTR_MAGIC {
            return Err(Error::BadHeader(format!(
                "bad footer magic: {magic:#010x}"
            )));
        }
        let _rsv = r.read_u32::<LE>()?;
        let wix_off = r.read_u64::<LE>()?;
        let chk_off = r.read_u64::<LE>()?;
        Ok(Footer { wix_off, chk_off })
    }
}

/// Reads the footer from the last `FOOTER_SIZE` bytes of a seekable reader
/// without disturbing its current position expectations elsewhere.
pub fn read_footer_from_end<R: Read + io::Seek>(r: &mut R) -> Result<Footer> {
    r.seek(io::SeekFrom::End(-(FOOTER_SIZE as i64)))?;
    Footer::read(r)
}
