//! Fixed-width numeric fields.
//!
//! Signed fields accept the symmetric range `[-(2^(8L-1) - 1), 2^(8L-1) - 1]`:
//! the most negative two's complement value is rejected on encode even though
//! it decodes fine. Peers written against the same layout rely on that.

use bytes::BufMut;

use super::{Field, NumericField, check_range};
use crate::{
    cursor::ByteCursor,
    errors::{ProtocolError, Result},
};

macro_rules! integer_field {
    ($(#[$meta:meta])* $name:ident: $ty:ty, min = $min:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Field for $name {
            type Value = $ty;

            fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<$ty> {
                Ok(<$ty>::from_be_bytes(cursor.read_array()?))
            }

            fn encode(&self, value: &$ty, dst: &mut impl BufMut) -> Result<()> {
                check_range(i128::from(*value), Self::MIN, Self::MAX)?;
                dst.put_slice(&value.to_be_bytes());
                Ok(())
            }
        }

        impl NumericField for $name {
            const LENGTH: usize = size_of::<$ty>();
            const MIN: i128 = $min;
            const MAX: i128 = <$ty>::MAX as i128;

            fn encode_wide(&self, value: i128, dst: &mut impl BufMut) -> Result<()> {
                check_range(value, Self::MIN, Self::MAX)?;
                let narrowed = <$ty>::try_from(value).map_err(|_| ProtocolError::Overflow {
                    value,
                    min: Self::MIN,
                    max: Self::MAX,
                })?;
                self.encode(&narrowed, dst)
            }
        }
    };
}

integer_field!(
    /// Signed 8-bit integer
    ByteField: i8, min = -(i8::MAX as i128)
);
integer_field!(
    /// Unsigned 8-bit integer
    UnsignedByteField: u8, min = 0
);
integer_field!(
    /// Signed 16-bit integer
    ShortField: i16, min = -(i16::MAX as i128)
);
integer_field!(
    /// Unsigned 16-bit integer, also the length prefix of strings and lists
    UnsignedShortField: u16, min = 0
);
integer_field!(
    /// Signed 32-bit integer
    IntField: i32, min = -(i32::MAX as i128)
);
integer_field!(
    /// Unsigned 32-bit integer
    UnsignedIntField: u32, min = 0
);
integer_field!(
    /// Signed 64-bit integer; GUIDs and timestamps
    LongLongField: i64, min = -(i64::MAX as i128)
);
integer_field!(
    /// Unsigned 64-bit integer
    UnsignedLongLongField: u64, min = 0
);

/// Unsigned 24-bit integer ("triad"), carried in a `u32`.
///
/// Used for datagram sequence numbers in acknowledgement ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TriadField;

impl Field for TriadField {
    type Value = u32;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<u32> {
        let [high, mid, low] = cursor.read_array()?;
        Ok(u32::from_be_bytes([0, high, mid, low]))
    }

    fn encode(&self, value: &u32, dst: &mut impl BufMut) -> Result<()> {
        check_range(i128::from(*value), Self::MIN, Self::MAX)?;
        dst.put_uint(u64::from(*value), Self::LENGTH);
        Ok(())
    }
}

impl NumericField for TriadField {
    const LENGTH: usize = 3;
    const MIN: i128 = 0;
    const MAX: i128 = 0xFF_FFFF;

    fn encode_wide(&self, value: i128, dst: &mut impl BufMut) -> Result<()> {
        check_range(value, Self::MIN, Self::MAX)?;
        self.encode(&(value as u32), dst)
    }
}

macro_rules! float_field {
    ($(#[$meta:meta])* $name:ident: $ty:ty, $put:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Field for $name {
            type Value = $ty;

            fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<$ty> {
                Ok(<$ty>::from_be_bytes(cursor.read_array()?))
            }

            fn encode(&self, value: &$ty, dst: &mut impl BufMut) -> Result<()> {
                dst.$put(*value);
                Ok(())
            }
        }
    };
}

float_field!(
    /// IEEE-754 single precision
    FloatField: f32, put_f32
);
float_field!(
    /// IEEE-754 double precision
    DoubleField: f64, put_f64
);

/// Boolean byte: `0x00` is false, anything else is true.
///
/// Always encodes as `0x00` or `0x01`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoolField;

impl Field for BoolField {
    type Value = bool;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<bool> {
        let [byte] = cursor.read_array()?;
        Ok(byte != 0)
    }

    fn encode(&self, value: &bool, dst: &mut impl BufMut) -> Result<()> {
        dst.put_u8(u8::from(*value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use proptest::prelude::*;

    use super::*;

    fn encode<F: Field>(field: &F, value: &F::Value) -> Vec<u8> {
        field.encode_to_bytes(value).expect("should encode").to_vec()
    }

    fn overflows<F: NumericField>(field: &F, value: i128) -> bool {
        matches!(
            field.encode_wide(value, &mut Vec::new()),
            Err(ProtocolError::Overflow { .. })
        )
    }

    #[test]
    fn byte_field() {
        let field = ByteField;

        assert_eq!(
            field.encode_to_bytes(&-128),
            Err(ProtocolError::Overflow { value: -128, min: -127, max: 127 })
        );

        assert_eq!(encode(&field, &-127), hex!("81"));
        assert_eq!(field.decode_bytes(&hex!("81")), Ok(-127));

        assert_eq!(encode(&field, &0), hex!("00"));
        assert_eq!(field.decode_bytes(&hex!("00")), Ok(0));

        assert_eq!(encode(&field, &127), hex!("7f"));
        assert_eq!(field.decode_bytes(&hex!("7f")), Ok(127));

        assert!(overflows(&field, 128));
    }

    #[test]
    fn unsigned_byte_field() {
        let field = UnsignedByteField;

        assert!(overflows(&field, -1));
        assert_eq!(encode(&field, &0), hex!("00"));
        assert_eq!(encode(&field, &255), hex!("ff"));
        assert_eq!(field.decode_bytes(&hex!("ff")), Ok(255));
        assert!(overflows(&field, 256));
    }

    #[test]
    fn triad_field() {
        let field = TriadField;

        assert!(overflows(&field, -1));

        for (value, wire) in [
            (0, hex!("000000")),
            (1, hex!("000001")),
            (256, hex!("000100")),
            (16_777_215, hex!("ffffff")),
        ] {
            assert_eq!(encode(&field, &value), wire);
            assert_eq!(field.decode_bytes(&wire), Ok(value));
        }

        assert_eq!(
            field.encode_to_bytes(&16_777_216),
            Err(ProtocolError::Overflow { value: 16_777_216, min: 0, max: 16_777_215 })
        );
    }

    #[test]
    fn triad_needs_three_bytes() {
        assert_eq!(
            TriadField.decode_bytes(&hex!("0001")),
            Err(ProtocolError::EndOfStream { requested: 3, remaining: 2 })
        );
    }

    #[test]
    fn unsigned_short_field() {
        let field = UnsignedShortField;

        assert!(overflows(&field, -1));
        assert_eq!(encode(&field, &0), hex!("0000"));
        assert_eq!(encode(&field, &65535), hex!("ffff"));
        assert_eq!(field.decode_bytes(&hex!("ffff")), Ok(65535));
        assert!(overflows(&field, 65536));
    }

    #[test]
    fn int_field() {
        let field = IntField;

        assert_eq!(
            field.encode_to_bytes(&i32::MIN),
            Err(ProtocolError::Overflow {
                value: -2_147_483_648,
                min: -2_147_483_647,
                max: 2_147_483_647
            })
        );
        assert_eq!(encode(&field, &-2_147_483_647), hex!("80000001"));
        assert_eq!(field.decode_bytes(&hex!("80000001")), Ok(-2_147_483_647));
        assert_eq!(encode(&field, &0), hex!("00000000"));
        assert_eq!(encode(&field, &2_147_483_647), hex!("7fffffff"));
        assert_eq!(field.decode_bytes(&hex!("7fffffff")), Ok(2_147_483_647));
        assert!(overflows(&field, 2_147_483_648));
    }

    #[test]
    fn long_long_field() {
        let field = LongLongField;

        assert!(field.encode_to_bytes(&i64::MIN).is_err());
        assert_eq!(encode(&field, &-9_223_372_036_854_775_807), hex!("8000000000000001"));
        assert_eq!(
            field.decode_bytes(&hex!("8000000000000001")),
            Ok(-9_223_372_036_854_775_807)
        );
        assert_eq!(encode(&field, &0), hex!("0000000000000000"));
        assert_eq!(encode(&field, &i64::MAX), hex!("7fffffffffffffff"));
        assert_eq!(field.decode_bytes(&hex!("7fffffffffffffff")), Ok(i64::MAX));
        assert!(overflows(&field, 9_223_372_036_854_775_808));
    }

    #[test]
    fn most_negative_value_still_decodes() {
        assert_eq!(ByteField.decode_bytes(&hex!("80")), Ok(i8::MIN));
        assert_eq!(IntField.decode_bytes(&hex!("80000000")), Ok(i32::MIN));
    }

    #[test]
    fn float_field() {
        let field = FloatField;

        assert_eq!(encode(&field, &-300.0), hex!("c3960000"));
        assert_eq!(field.decode_bytes(&hex!("c3960000")), Ok(-300.0));
        assert_eq!(encode(&field, &0.0), hex!("00000000"));
        assert_eq!(encode(&field, &300.0), hex!("43960000"));
        assert_eq!(field.decode_bytes(&hex!("43960000")), Ok(300.0));

        for wire in [hex!("ff735783"), hex!("7f735783")] {
            let value = field.decode_bytes(&wire).unwrap();
            assert!((value.abs() - 3.234_567_8e38).abs() < 3.234_567_8e38 * 1e-7);
            assert_eq!(encode(&field, &value), wire);
        }
    }

    #[test]
    fn double_field() {
        let field = DoubleField;

        assert_eq!(encode(&field, &-300.0), hex!("c072c00000000000"));
        assert_eq!(field.decode_bytes(&hex!("c072c00000000000")), Ok(-300.0));
        assert_eq!(encode(&field, &0.0), hex!("0000000000000000"));
        assert_eq!(encode(&field, &300.0), hex!("4072c00000000000"));

        for wire in [hex!("cd53a830f3158961"), hex!("4d53a830f3158961")] {
            let value = field.decode_bytes(&wire).unwrap();
            assert!((value.abs() - 3.234_567_8e64).abs() < 3.234_567_8e64 * 1e-8);
            assert_eq!(encode(&field, &value), wire);
        }
    }

    #[test]
    fn bool_field() {
        let field = BoolField;

        assert_eq!(encode(&field, &false), hex!("00"));
        assert_eq!(encode(&field, &true), hex!("01"));
        assert_eq!(field.decode_bytes(&hex!("00")), Ok(false));
        assert_eq!(field.decode_bytes(&hex!("01")), Ok(true));
        assert_eq!(field.decode_bytes(&hex!("7f")), Ok(true));
        assert_eq!(field.decode_bytes(&hex!("ff")), Ok(true));
    }

    #[test]
    fn numeric_lengths() {
        assert_eq!(ByteField::LENGTH, 1);
        assert_eq!(UnsignedShortField::LENGTH, 2);
        assert_eq!(TriadField::LENGTH, 3);
        assert_eq!(IntField::LENGTH, 4);
        assert_eq!(UnsignedLongLongField::LENGTH, 8);
    }

    fn assert_bounds<F>(field: &F)
    where
        F: NumericField,
        F::Value: TryFrom<i128> + PartialEq + std::fmt::Debug,
    {
        for bound in [F::MIN, F::MAX] {
            let mut wire = Vec::new();
            field.encode_wide(bound, &mut wire).expect("bound should encode");
            assert_eq!(wire.len(), F::LENGTH);

            let expected = <F::Value as TryFrom<i128>>::try_from(bound).ok();
            assert_eq!(field.decode_bytes(&wire).ok(), expected);
        }
        assert!(overflows(field, F::MIN - 1));
        assert!(overflows(field, F::MAX + 1));
    }

    #[test]
    fn every_numeric_field_rejects_just_outside_its_bounds() {
        assert_bounds(&ByteField);
        assert_bounds(&UnsignedByteField);
        assert_bounds(&ShortField);
        assert_bounds(&UnsignedShortField);
        assert_bounds(&TriadField);
        assert_bounds(&IntField);
        assert_bounds(&UnsignedIntField);
        assert_bounds(&LongLongField);
        assert_bounds(&UnsignedLongLongField);
    }

    #[test]
    fn single_byte_fields_round_trip_exhaustively() {
        for value in -i8::MAX..=i8::MAX {
            let wire = ByteField.encode_to_bytes(&value).unwrap();
            assert_eq!(ByteField.decode_bytes(&wire), Ok(value));
        }
        for value in 0..=u8::MAX {
            let wire = UnsignedByteField.encode_to_bytes(&value).unwrap();
            assert_eq!(&wire[..], &[value]);
            assert_eq!(UnsignedByteField.decode_bytes(&wire), Ok(value));
        }
    }

    #[test]
    fn unsigned_short_round_trips_exhaustively() {
        for value in 0..=u16::MAX {
            let wire = UnsignedShortField.encode_to_bytes(&value).unwrap();
            assert_eq!(UnsignedShortField.decode_bytes(&wire), Ok(value));
        }
    }

    proptest! {
        #[test]
        fn int_round_trip(value in -i32::MAX..=i32::MAX) {
            let wire = IntField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(IntField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn unsigned_long_long_round_trip(value in any::<u64>()) {
            let wire = UnsignedLongLongField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(wire.len(), 8);
            prop_assert_eq!(UnsignedLongLongField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn float_round_trip(value in any::<f32>().prop_filter("nan", |v| !v.is_nan())) {
            let wire = FloatField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(FloatField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn long_long_round_trip(value in -i64::MAX..=i64::MAX) {
            let wire = LongLongField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(LongLongField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn short_round_trip(value in -i16::MAX..=i16::MAX) {
            let wire = ShortField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(ShortField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn unsigned_int_round_trip(value in any::<u32>()) {
            let wire = UnsignedIntField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(UnsignedIntField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn triad_round_trip(value in 0u32..=0xFF_FFFF) {
            let wire = TriadField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(wire.len(), 3);
            prop_assert_eq!(TriadField.decode_bytes(&wire), Ok(value));
        }

        #[test]
        fn double_round_trip(value in any::<f64>().prop_filter("nan", |v| !v.is_nan())) {
            let wire = DoubleField.encode_to_bytes(&value).unwrap();
            prop_assert_eq!(DoubleField.decode_bytes(&wire), Ok(value));
        }
    }
}
