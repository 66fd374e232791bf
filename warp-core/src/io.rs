//! Positional I/O: offset-parameterized read/write over a shared file
//! descriptor, safe to call concurrently from many worker threads without
//! any external locking.

use std::fs::File;
use std::os::unix::fs::FileExt;

use crate::error::{Error, Result};

/// Reads exactly `buf.len()` bytes from `file` at absolute offset `offset`.
/// Retries on short reads; an EOF before `buf` is full is a hard failure.
pub fn read_exact_at(file: &File, buf: &mut [u8], mut offset: u64) -> Result<()> {
    let mut pos = 0;
    while pos < buf.len() {
        let n = file.read_at(&mut buf[pos..], offset)?;
        if n == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "positional read hit EOF before filling the buffer",
            )));
        }
        pos += n;
        offset += n as u64;
    }
    Ok(())
}

/// Writes all of `buf` to `file` at absolute offset `offset`. Atomic with
/// respect to other positional writes on the same descriptor: `write_at`
/// is a single `pwrite(2)` per retry iteration, which the kernel does not
/// interleave with other positional writes.
pub fn write_all_at(file: &File, buf: &[u8], mut offset: u64) -> Result<()> {
    let mut pos = 0;
    while pos < buf.len() {
        let n = file.write_at(&buf[pos..], offset)?;
        if n == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "positional write made no progress",
            )));
        }
        pos += n;
        offset += n as u64;
    }
    Ok(())
}

/// Pre-sizes `file` to `size` bytes, best-effort: failure here is non-fatal,
/// later positional writes will simply extend the file.
pub fn presize(file: &File, size: u64) {
    if let Err(err) = file.set_len(size) {
        tracing::debug!(error = %err, size, "best-effort output pre-sizing failed, continuing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};

    #[test]
    fn write_then_read_round_trips() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = tmp.reopen().unwrap();
        write_all_at(&file, b"hello", 10).unwrap();
        let mut buf = [0u8; 5];
        read_exact_at(&file, &mut buf, 10).unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn read_past_eof_fails() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = tmp.reopen().unwrap();
        file.set_len(4).unwrap();
        let mut buf = [0u8; 16];
        assert!(read_exact_at(&file, &mut buf, 0).is_err());
    }

    #[test]
    fn presize_extends_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = tmp.reopen().unwrap();
        presize(&file, 4096);
        let mut f2 = tmp.reopen().unwrap();
        f2.seek(SeekFrom::End(0)).unwrap();
        let mut s = String::new();
        let _ = f2.read_to_string(&mut s);
        assert_eq!(tmp.path().metadata().unwrap().len(), 4096);
    }
}
