//! Primitive big-endian reads over a forward-only byte source.
//!
//! [`ClassReader`] wraps any [`std::io::Read`] and exposes the fixed-width
//! unsigned reads the class file grammar is built from. End of stream inside
//! a field becomes [`ReadError::IncompleteData`]; every other I/O fault from
//! the source is passed through untouched as [`Error::Io`].
//!
//! Nothing here seeks or buffers. Callers that read from files should hand
//! in a `BufReader`.

use crate::error::{Error, ReadError, Result};
use java_string::{JavaStr, JavaString};
use std::borrow::Cow;
use std::io::{self, Read};

/// Forward-only big-endian reader that tracks how many bytes it has consumed
#[derive(Debug)]
pub struct ClassReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ClassReader<R> {
    /// Wraps a byte source
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads one byte
    pub fn read_u1(&mut self) -> Result<u8> {
        self.read_byte("failed to read u1 field")
    }

    /// Reads a big-endian u16, one byte at a time
    pub fn read_u2(&mut self) -> Result<u16> {
        let hi = self.read_byte("failed to read u2 field (high byte)")?;
        let lo = self.read_byte("failed to read u2 field (low byte)")?;
        Ok(((hi as u16) << 8) | lo as u16)
    }

    /// Reads a big-endian u32
    pub fn read_u4(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, "failed to read u4 field")?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Reads the next byte, or `None` if the stream is already exhausted.
    ///
    /// Used where running out of input has a meaning of its own (the magic
    /// header) rather than being a truncated field.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Discards one byte
    pub fn skip_u1(&mut self) -> Result<()> {
        self.skip_exact(1, "failed to skip u1 field")
    }

    /// Discards two bytes
    pub fn skip_u2(&mut self) -> Result<()> {
        self.skip_exact(2, "failed to skip u2 field")
    }

    /// Discards four bytes
    pub fn skip_u4(&mut self) -> Result<()> {
        self.skip_exact(4, "failed to skip u4 field")
    }

    /// Discards a block of `count` bytes
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.skip_exact(count, &format!("failed to skip block of length {}", count))
    }

    /// Reads a u2-length-prefixed modified UTF-8 string.
    ///
    /// The result keeps unpaired surrogates, so two names that differ only
    /// in such a code unit stay distinct.
    pub fn read_modified_utf8(&mut self) -> Result<JavaString> {
        let len = self.read_u2()? as usize;
        let mut buf = vec![0u8; len];
        self.fill(&mut buf, "incomplete string")?;
        JavaStr::from_modified_utf8(&buf)
            .map(Cow::into_owned)
            .map_err(|e| Error::from(ReadError::invalid_data_caused_by("invalid string", e)))
    }

    fn read_byte(&mut self, what: &str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, what)?;
        Ok(buf[0])
    }

    fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(ReadError::incomplete(self.offset, what).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn skip_exact(&mut self, count: u64, what: &str) -> Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        let start = self.offset;
        self.offset += skipped;
        if skipped != count {
            return Err(ReadError::incomplete(start, what).into());
        }
        Ok(())
    }
}
