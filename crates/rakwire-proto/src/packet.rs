//! Packet schema: an ID byte followed by an ordered list of fields.
//!
//! Concrete packets are declared with the crate-internal `packet!` macro,
//! which turns one layout description into the record struct, its [`Packet`]
//! implementation and its `Display`. Decode and encode walk the same slot
//! order, so the two directions cannot drift apart.
//!
//! # Wire Format
//!
//! ```text
//! [id: u8] [slot 0] [slot 1] ... [slot n]
//! ```
//!
//! A datagram decodes only if the ID matches and the slots consume every
//! byte after it.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    cursor::ByteCursor,
    errors::{ProtocolError, Result},
    fields::{DisplayValue, Field, UnsignedByteField},
};

/// One position in a packet layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A named field stored in the packet record
    Field(&'static str),
    /// The offline magic; validated on decode, never stored
    Magic,
}

/// A packet type with a fixed ID and field layout.
pub trait Packet: Sized {
    /// Leading ID byte
    const ID: u8;

    /// Type name used in logs and `Display`
    const NAME: &'static str;

    /// Declared layout, in wire order
    const STRUCTURE: &'static [Slot];

    /// Decode the slots that follow the ID byte.
    fn decode_body(cursor: &mut ByteCursor<'_>) -> Result<Self>;

    /// Encode the slots that follow the ID byte.
    fn encode_body(&self, dst: &mut impl BufMut) -> Result<()>;

    /// Decode a complete datagram.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::EndOfStream`] if `bytes` is empty or a slot runs
    ///   past the end
    /// - [`ProtocolError::PacketIdMismatch`] if the ID byte is not [`Self::ID`]
    /// - [`ProtocolError::RemainingData`] if bytes are left after the last
    ///   slot
    /// - any error raised by a slot's field
    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);

        let id = UnsignedByteField.decode(&mut cursor)?;
        if id != Self::ID {
            return Err(ProtocolError::PacketIdMismatch { expected: Self::ID, actual: id });
        }

        let packet = Self::decode_body(&mut cursor)?;

        if !cursor.is_empty() {
            let remaining = cursor.remaining();
            tracing::debug!(packet = Self::NAME, remaining, "trailing bytes after packet body");
            return Err(ProtocolError::RemainingData { remaining });
        }

        Ok(packet)
    }

    /// Encode the ID byte followed by every slot.
    ///
    /// The body is staged first, so `dst` is left untouched on error.
    fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        let mut body = BytesMut::new();
        self.encode_body(&mut body)?;

        dst.put_u8(Self::ID);
        dst.put_slice(&body);
        Ok(())
    }

    /// Encode into a fresh buffer.
    fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// [`Self::ID`], reachable from a value.
    fn id(&self) -> u8 {
        Self::ID
    }
}

/// Render `Name(a=1, b=2)`.
pub(crate) fn write_record(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    values: &[(&str, &dyn DisplayValue)],
) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, (field, value)) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{field}=")?;
        value.fmt_value(f)?;
    }
    f.write_str(")")
}

/// Declare a packet layout.
///
/// ```ignore
/// packet! {
///     /// Docs for the struct
///     UnconnectedPing = 0x01 {
///         /// Docs for the field
///         ping_id: LongLongField,
///         @magic,
///         mtu_size: PaddingField = PaddingField::new(MTU_PADDING_OFFSET),
///     }
/// }
/// ```
///
/// Each entry is `name: FieldType`, `name: FieldType = instance` for fields
/// that need construction options, or `@magic`. Every entry ends in a comma.
macro_rules! packet {
    (
        $(#[$meta:meta])*
        $name:ident = $id:literal { $($body:tt)* }
    ) => {
        $crate::packet::packet! { @munch [$(#[$meta])* $name = $id] [] [] $($body)* }
    };

    // Layout parsing: collect struct fields and wire slots separately.
    (@munch $head:tt [$($fields:tt)*] [$($slots:tt)*] @magic, $($rest:tt)*) => {
        $crate::packet::packet! { @munch $head [$($fields)*] [$($slots)* [@magic]] $($rest)* }
    };
    (@munch $head:tt [$($fields:tt)*] [$($slots:tt)*]
        $(#[$fmeta:meta])* $field:ident : $fty:ty = $init:expr, $($rest:tt)*
    ) => {
        $crate::packet::packet! {
            @munch $head
            [$($fields)* [$(#[$fmeta])* $field : $fty]]
            [$($slots)* [$field : $fty = $init]]
            $($rest)*
        }
    };
    (@munch $head:tt [$($fields:tt)*] [$($slots:tt)*]
        $(#[$fmeta:meta])* $field:ident : $fty:ty, $($rest:tt)*
    ) => {
        $crate::packet::packet! {
            @munch $head
            [$($fields)* [$(#[$fmeta])* $field : $fty]]
            [$($slots)* [$field : $fty = <$fty as ::core::default::Default>::default()]]
            $($rest)*
        }
    };
    (@munch $head:tt [$($fields:tt)*] [$($slots:tt)*]) => {
        $crate::packet::packet! { @emit $head [$($fields)*] [$($slots)*] }
    };

    (@emit
        [$(#[$meta:meta])* $name:ident = $id:literal]
        [$([$(#[$fmeta:meta])* $field:ident : $fty:ty])*]
        [$($slot:tt)*]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: <$fty as $crate::fields::Field>::Value,
            )*
        }

        impl $crate::packet::Packet for $name {
            const ID: u8 = $id;
            const NAME: &'static str = stringify!($name);
            const STRUCTURE: &'static [$crate::packet::Slot] = &[
                $($crate::packet::packet!(@slot $slot),)*
            ];

            #[allow(unused_variables)]
            fn decode_body(
                cursor: &mut $crate::cursor::ByteCursor<'_>,
            ) -> $crate::errors::Result<Self> {
                $($crate::packet::packet! { @decode cursor $slot })*
                Ok(Self { $($field),* })
            }

            #[allow(unused_variables)]
            fn encode_body(
                &self,
                dst: &mut impl ::bytes::BufMut,
            ) -> $crate::errors::Result<()> {
                let Self { $($field),* } = self;
                $($crate::packet::packet! { @encode dst $slot })*
                Ok(())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let values: &[(&str, &dyn $crate::fields::DisplayValue)] = &[
                    $((stringify!($field), &self.$field as &dyn $crate::fields::DisplayValue),)*
                ];
                $crate::packet::write_record(
                    f,
                    <Self as $crate::packet::Packet>::NAME,
                    values,
                )
            }
        }
    };

    (@slot [@magic]) => {
        $crate::packet::Slot::Magic
    };
    (@slot [$field:ident : $fty:ty = $init:expr]) => {
        $crate::packet::Slot::Field(stringify!($field))
    };

    (@decode $cursor:ident [@magic]) => {
        $crate::fields::Field::decode(&$crate::fields::MagicField, $cursor)?;
    };
    (@decode $cursor:ident [$field:ident : $fty:ty = $init:expr]) => {
        let $field: <$fty as $crate::fields::Field>::Value =
            $crate::fields::Field::decode(&$init, $cursor)?;
    };

    (@encode $dst:ident [@magic]) => {
        $crate::fields::Field::encode(&$crate::fields::MagicField, &(), $dst)?;
    };
    (@encode $dst:ident [$field:ident : $fty:ty = $init:expr]) => {
        $crate::fields::Field::encode(&$init, $field, $dst)?;
    };
}

pub(crate) use packet;
