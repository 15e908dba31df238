//! Zero padding that encodes a length, used for MTU discovery.

use bytes::BufMut;

use super::Field;
use crate::{cursor::ByteCursor, errors::Result};

/// Zero padding whose length carries the value.
///
/// Decoding swallows the rest of the datagram and reports its length plus
/// `offset`, so a client can probe the path MTU by sending a datagram of the
/// size it wants to test. Encoding writes `value - offset` zero bytes, or
/// none when the value does not exceed the offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PaddingField {
    /// Bytes of the datagram that precede the padding
    pub offset: usize,
}

impl PaddingField {
    /// Padding that accounts for `offset` bytes of preceding header.
    #[must_use]
    pub const fn new(offset: usize) -> Self {
        Self { offset }
    }
}

impl Field for PaddingField {
    type Value = usize;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<usize> {
        Ok(cursor.read_all().len() + self.offset)
    }

    fn encode(&self, value: &usize, dst: &mut impl BufMut) -> Result<()> {
        dst.put_bytes(0, value.saturating_sub(self.offset));
        Ok(())
    }
}
