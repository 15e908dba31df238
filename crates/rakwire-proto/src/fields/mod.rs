//! Field codecs: the building blocks of every packet layout.
//!
//! A field is a stateless encode/decode unit for one wire value. Fields are
//! plain values (mostly unit structs) so a packet layout can name them in
//! declaration order and the packet decoder can walk that order.
//!
//! | Field | Value | Wire layout |
//! |---|---|---|
//! | [`ByteField`] / [`UnsignedByteField`] | `i8` / `u8` | 1 byte |
//! | [`ShortField`] / [`UnsignedShortField`] | `i16` / `u16` | 2 bytes |
//! | [`TriadField`] | `u32` | 3 bytes, unsigned |
//! | [`IntField`] / [`UnsignedIntField`] | `i32` / `u32` | 4 bytes |
//! | [`LongLongField`] / [`UnsignedLongLongField`] | `i64` / `u64` | 8 bytes |
//! | [`FloatField`] / [`DoubleField`] | `f32` / `f64` | 4 / 8 bytes, IEEE-754 |
//! | [`BoolField`] | `bool` | 1 byte |
//! | [`StringField`] | `String` | u16 length + UTF-8 |
//! | [`OptionsField`] | [`MessageOptions`] | 1 byte bitfield |
//! | [`AddressField`] | [`Address`] | version + 4 octets + u16 port |
//! | [`RangeListField`] | `Vec<Range>` | u16 count + packed ranges |
//! | [`PaddingField`] | `usize` | N zero bytes |
//! | [`MagicField`] | `()` | 16-byte offline magic |
//!
//! All multi-byte values are Big Endian.

mod address;
mod magic;
mod numeric;
mod options;
mod padding;
mod range_list;
mod string;

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

pub use address::{Address, AddressField};
pub use magic::MagicField;
pub use numeric::{
    BoolField, ByteField, DoubleField, FloatField, IntField, LongLongField, ShortField,
    TriadField, UnsignedByteField, UnsignedIntField, UnsignedLongLongField, UnsignedShortField,
};
pub use options::{MessageOptions, OptionFlags, OptionsField, Priority, Reliability};
pub use padding::PaddingField;
pub use range_list::{Range, RangeListField};
pub use string::{Optional, StringField};

use crate::{
    cursor::ByteCursor,
    errors::{ProtocolError, Result},
};

/// A stateless codec for one wire value.
///
/// `decode` consumes exactly the bytes the value occupies from the cursor;
/// `encode` appends exactly those bytes to the destination.
pub trait Field {
    /// Decoded representation
    type Value;

    /// Decode one value at the cursor position.
    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<Self::Value>;

    /// Encode one value.
    ///
    /// Nothing is written when this returns an error.
    fn encode(&self, value: &Self::Value, dst: &mut impl BufMut) -> Result<()>;

    /// Decode from the start of a raw buffer.
    ///
    /// Trailing bytes are ignored; only packets enforce full consumption.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<Self::Value> {
        self.decode(&mut ByteCursor::new(bytes))
    }

    /// Encode into a fresh buffer.
    fn encode_to_bytes(&self, value: &Self::Value) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(value, &mut buf)?;
        Ok(buf.freeze())
    }
}

/// A fixed-width integer field with a closed value range.
///
/// Bounds are expressed as `i128` so values the native type cannot hold
/// (`max + 1` for a `u8`, say) can still be checked and rejected.
pub trait NumericField: Field {
    /// Encoded width in bytes
    const LENGTH: usize;

    /// Smallest encodable value
    const MIN: i128;

    /// Largest encodable value
    const MAX: i128;

    /// Range-check an arbitrary integer, then encode it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Overflow`] if `value` is outside
    /// `[MIN, MAX]`.
    fn encode_wide(&self, value: i128, dst: &mut impl BufMut) -> Result<()>;
}

/// Fail with [`ProtocolError::Overflow`] unless `min <= value <= max`.
pub(crate) fn check_range(value: i128, min: i128, max: i128) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ProtocolError::Overflow { value, min, max })
    }
}

/// Rendering of a decoded value inside a packet's `Name(field=value)` form.
pub trait DisplayValue {
    /// Write the value.
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! display_value_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DisplayValue for $ty {
                fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}

display_value_via_display!(
    i8, u8, i16, u16, i32, u32, i64, u64, usize, f32, f64, bool, String, Address, Range,
    MessageOptions,
);

impl<T: DisplayValue> DisplayValue for Option<T> {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => value.fmt_value(f),
            None => f.write_str("None"),
        }
    }
}

impl<T: DisplayValue> DisplayValue for Vec<T> {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            value.fmt_value(f)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shown<'a>(&'a dyn DisplayValue);

    impl fmt::Display for Shown<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt_value(f)
        }
    }

    #[test]
    fn check_range_is_inclusive() {
        assert!(check_range(0, 0, 255).is_ok());
        assert!(check_range(255, 0, 255).is_ok());
        assert_eq!(
            check_range(256, 0, 255),
            Err(ProtocolError::Overflow { value: 256, min: 0, max: 255 })
        );
        assert!(check_range(-1, 0, 255).is_err());
    }

    #[test]
    fn display_values() {
        assert_eq!(Shown(&42i64).to_string(), "42");
        assert_eq!(Shown(&Some("hi".to_string())).to_string(), "hi");
        assert_eq!(Shown(&Option::<String>::None).to_string(), "None");
        assert_eq!(
            Shown(&vec![Range::new(0, 0), Range::new(1, 600)]).to_string(),
            "[0..=0, 1..=600]"
        );
    }

    #[test]
    fn decode_bytes_ignores_trailing_data() {
        assert_eq!(UnsignedShortField.decode_bytes(&[0x01, 0x00, 0xff]), Ok(256));
    }
}
