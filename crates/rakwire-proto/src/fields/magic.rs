//! The offline message magic.

use bytes::BufMut;

use super::Field;
use crate::{
    consts::MAGIC,
    cursor::ByteCursor,
    errors::{ProtocolError, Result},
};

/// The fixed 16-byte offline magic. Carries no value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MagicField;

impl Field for MagicField {
    type Value = ();

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<()> {
        let found = cursor.read(MAGIC.len())?;
        if found != MAGIC.as_slice() {
            return Err(ProtocolError::invalid_magic(found));
        }
        Ok(())
    }

    fn encode(&self, _value: &(), dst: &mut impl BufMut) -> Result<()> {
        dst.put_slice(&MAGIC);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn encodes_the_magic() {
        assert_eq!(
            MagicField.encode_to_bytes(&()).unwrap(),
            &hex!("00ffff00fefefefefdfdfdfd12345678")[..]
        );
    }

    #[test]
    fn accepts_the_magic() {
        assert_eq!(MagicField.decode_bytes(&MAGIC), Ok(()));
    }

    #[test]
    fn rejects_other_bytes() {
        let mut wire = MAGIC;
        wire[15] = 0x79;
        assert_eq!(
            MagicField.decode_bytes(&wire),
            Err(ProtocolError::InvalidMagic { found: "00ffff00fefefefefdfdfdfd12345679".into() })
        );
    }

    #[test]
    fn rejects_a_truncated_magic() {
        assert!(matches!(
            MagicField.decode_bytes(&MAGIC[..10]),
            Err(ProtocolError::InvalidMagic { .. })
        ));
        assert_eq!(
            MagicField.decode_bytes(&[]),
            Err(ProtocolError::EndOfStream { requested: 16, remaining: 0 })
        );
    }
}
