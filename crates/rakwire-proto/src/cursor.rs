//! Seekable read-only view over a datagram.
//!
//! Every field decoder reads through a [`ByteCursor`]. One cursor is created
//! per decode and dropped afterwards; it never owns or copies the buffer.

use std::{io::SeekFrom, ops::Index, slice::SliceIndex};

use crate::errors::{ProtocolError, Result};

/// Read cursor over an immutable byte buffer.
///
/// # Invariants
///
/// - The offset always lies in `[0, len]`. Seeks past either end saturate.
/// - Indexing (`cursor[i]`, `cursor[a..b]`) addresses the **whole** buffer,
///   not the unread tail. Only the `read*` methods are relative to the
///   offset.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Read up to `len` bytes and advance past them.
    ///
    /// The read is clamped to the end of the buffer, so fewer than `len`
    /// bytes may come back. A zero-length request always succeeds with an
    /// empty slice. Use [`read_all`](Self::read_all) to drain the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::EndOfStream`] if `len > 0` and the cursor is
    /// already at the end.
    pub fn read(&mut self, len: usize) -> Result<&'a [u8]> {
        if len == 0 {
            return Ok(&[]);
        }

        let start = self.offset;
        let end = start.saturating_add(len).min(self.buf.len());
        self.offset = end;

        let data = &self.buf[start..end];
        if data.is_empty() {
            return Err(ProtocolError::EndOfStream { requested: len, remaining: 0 });
        }
        Ok(data)
    }

    /// Read exactly `len` bytes.
    ///
    /// Unlike [`read`](Self::read) this never returns a short slice; the
    /// cursor does not move when the read fails.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        let data = self.buf[self.offset..]
            .get(..len)
            .ok_or(ProtocolError::EndOfStream { requested: len, remaining })?;
        self.offset += len;
        Ok(data)
    }

    /// Read a fixed-width chunk, as used by the numeric fields.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let remaining = self.remaining();
        let chunk = self.buf[self.offset..]
            .first_chunk::<N>()
            .ok_or(ProtocolError::EndOfStream { requested: N, remaining })?;
        self.offset += N;
        Ok(*chunk)
    }

    /// Return everything from the offset to the end and move to the end.
    ///
    /// Never fails; the slice is empty when nothing is left.
    pub fn read_all(&mut self) -> &'a [u8] {
        let data = &self.buf[self.offset..];
        self.offset = self.buf.len();
        data
    }

    /// Move the offset and return the new position.
    ///
    /// The target is clamped into `[0, len]`: seeking past the end stops at
    /// the end and seeking before the start stops at 0.
    pub fn seek(&mut self, pos: SeekFrom) -> usize {
        let len = self.buf.len() as i128;
        let target = match pos {
            SeekFrom::Start(n) => i128::from(n),
            SeekFrom::Current(delta) => self.offset as i128 + i128::from(delta),
            SeekFrom::End(delta) => len + i128::from(delta),
        };
        self.offset = target.clamp(0, len) as usize;
        self.offset
    }

    /// Current offset.
    #[must_use]
    pub const fn tell(&self) -> usize {
        self.offset
    }

    /// Number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// True once every byte has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole underlying buffer, regardless of the offset.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.buf
    }
}

impl<I: SliceIndex<[u8]>> Index<I> for ByteCursor<'_> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        &self.buf[index]
    }
}
