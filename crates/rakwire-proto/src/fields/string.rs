//! Length-prefixed UTF-8 strings and the non-required wrapper.

use bytes::BufMut;

use super::{Field, NumericField, UnsignedShortField};
use crate::{
    cursor::ByteCursor,
    errors::{ProtocolError, Result},
};

/// UTF-8 string prefixed by its byte length as a `u16`.
///
/// A payload shorter than its prefix is rejected rather than truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringField;

impl StringField {
    /// The same field, but absent instead of failing when the buffer is
    /// already exhausted.
    #[must_use]
    pub const fn optional() -> Optional<Self> {
        Optional(Self)
    }
}

impl Field for StringField {
    type Value = String;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<String> {
        let len = UnsignedShortField.decode(cursor)?;
        let payload = cursor.read_exact(usize::from(len))?;
        String::from_utf8(payload.to_vec()).map_err(|e| ProtocolError::InvalidUtf8(e.to_string()))
    }

    fn encode(&self, value: &String, dst: &mut impl BufMut) -> Result<()> {
        UnsignedShortField.encode_wide(value.len() as i128, dst)?;
        dst.put_slice(value.as_bytes());
        Ok(())
    }
}

/// Non-required wrapper around another field.
///
/// Decodes to `None` when the cursor has nothing left to read; any other
/// failure of the inner field still propagates. `None` encodes to zero bytes,
/// so an absent trailing value round-trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Optional<F>(pub F);

impl<F: Field> Field for Optional<F> {
    type Value = Option<F::Value>;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<Self::Value> {
        if cursor.is_empty() {
            return Ok(None);
        }
        self.0.decode(cursor).map(Some)
    }

    fn encode(&self, value: &Self::Value, dst: &mut impl BufMut) -> Result<()> {
        match value {
            Some(inner) => self.0.encode(inner, dst),
            None => Ok(()),
        }
    }
}
