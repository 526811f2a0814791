//! Byte-oriented reader and writer over in-memory buffers.
//!
//! BSAX ist ein reines Byte-Format (keine Bit-Packung), daher genügt hier
//! ein positionsverfolgender Slice-Reader und ein Vec-Writer.

use crate::{Error, Result};

/// Writer that accumulates the encoded stream in memory.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Appends a byte slice.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Reader over an in-memory stream with byte-offset tracking.
///
/// Every read past the end yields [`Error::TruncatedStream`] with the
/// offset at which input ran out. Clean end-of-stream detection at the
/// top-level opcode boundary is the decoder's job via [`ByteReader::is_at_end`].
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset from the start of the stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True when all input has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads one byte.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(Error::TruncatedStream { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly `len` bytes, borrowed from the underlying buffer.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::TruncatedStream { offset: self.data.len() })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_round_trip() {
        let mut w = ByteWriter::new();
        w.write_byte(0x42);
        w.write_bytes(&[0x53, 0x41, 0x58]);
        assert_eq!(w.len(), 4);
        assert_eq!(w.into_vec(), b"BSAX");
    }

    #[test]
    fn writer_is_empty() {
        let w = ByteWriter::new();
        assert!(w.is_empty());
    }

    #[test]
    fn reader_sequential_bytes() {
        let mut r = ByteReader::new(&[1, 2, 3]);
        assert_eq!(r.read_byte().unwrap(), 1);
        assert_eq!(r.position(), 1);
        assert_eq!(r.read_bytes(2).unwrap(), &[2, 3]);
        assert!(r.is_at_end());
    }

    #[test]
    fn reader_truncation_reports_offset() {
        let mut r = ByteReader::new(&[1]);
        r.read_byte().unwrap();
        assert_eq!(
            r.read_byte().unwrap_err(),
            Error::TruncatedStream { offset: 1 }
        );
    }

    #[test]
    fn reader_read_bytes_past_end() {
        let mut r = ByteReader::new(&[1, 2]);
        assert_eq!(
            r.read_bytes(3).unwrap_err(),
            Error::TruncatedStream { offset: 2 }
        );
        // Fehlschlag konsumiert nichts
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn reader_empty_is_at_end() {
        let r = ByteReader::new(&[]);
        assert!(r.is_at_end());
    }
}
