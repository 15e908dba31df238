//! Message options byte: reliability class and split flag.
//!
//! ```text
//! bit  7 6 5   4     3 2 1 0
//!     [ rel ] [split] [unused]
//! ```
//!
//! Unused low bits are ignored on decode and written as zero.

use std::fmt;

use bitflags::bitflags;
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::Field;
use crate::{
    cursor::ByteCursor,
    errors::Result,
};

const RELIABILITY_SHIFT: u32 = 5;

/// Delivery guarantee requested for a message.
///
/// Codes are 3 bits wide on the wire, so every value in `0..=7` is valid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum Reliability {
    /// Plain datagram; duplicates are discarded
    #[default]
    Unreliable = 0x00,
    /// Out-of-order datagrams are discarded
    UnreliableSequenced = 0x01,
    /// Delivered, in any order
    Reliable = 0x02,
    /// Delivered in send order; later messages wait for earlier ones
    ReliableOrdered = 0x03,
    /// Delivered, out-of-order messages dropped
    ReliableSequenced = 0x04,
    /// Unreliable, sender is told whether it arrived
    UnreliableWithAckReceipt = 0x05,
    /// Reliable, sender is told when it arrived
    ReliableWithAckReceipt = 0x06,
    /// Reliable ordered, sender is told when it arrived
    ReliableOrderedWithAckReceipt = 0x07,
}

impl Reliability {
    /// Look up a reliability code; `None` above `0x07`.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Unreliable),
            0x01 => Some(Self::UnreliableSequenced),
            0x02 => Some(Self::Reliable),
            0x03 => Some(Self::ReliableOrdered),
            0x04 => Some(Self::ReliableSequenced),
            0x05 => Some(Self::UnreliableWithAckReceipt),
            0x06 => Some(Self::ReliableWithAckReceipt),
            0x07 => Some(Self::ReliableOrderedWithAckReceipt),
            _ => None,
        }
    }

    /// Wire code.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    // Low 3 bits only, so every input names a reliability
    const fn from_code_bits(code: u8) -> Self {
        match code & 0x07 {
            0x00 => Self::Unreliable,
            0x01 => Self::UnreliableSequenced,
            0x02 => Self::Reliable,
            0x03 => Self::ReliableOrdered,
            0x04 => Self::ReliableSequenced,
            0x05 => Self::UnreliableWithAckReceipt,
            0x06 => Self::ReliableWithAckReceipt,
            _ => Self::ReliableOrderedWithAckReceipt,
        }
    }

    /// Whether delivery is retried until acknowledged.
    #[must_use]
    pub const fn is_reliable(self) -> bool {
        matches!(
            self,
            Self::Reliable
                | Self::ReliableOrdered
                | Self::ReliableSequenced
                | Self::ReliableWithAckReceipt
                | Self::ReliableOrderedWithAckReceipt
        )
    }

    /// Whether the message carries an ordering channel.
    ///
    /// Only the sequenced classes and plain `ReliableOrdered` count; the
    /// ack-receipt variants do not.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::UnreliableSequenced | Self::ReliableOrdered | Self::ReliableSequenced)
    }

    /// Whether stale messages are dropped instead of delivered late.
    #[must_use]
    pub const fn is_sequenced(self) -> bool {
        matches!(self, Self::UnreliableSequenced | Self::ReliableSequenced)
    }
}

/// Send priority. Not carried in any offline packet; exposed for the layers
/// that schedule sends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum Priority {
    /// Sent immediately, never aggregated
    Immediate = 0x00,
    /// One for every two `Immediate`
    High = 0x01,
    /// One for every two `High`
    Medium = 0x02,
    /// One for every two `Medium`
    Low = 0x03,
}

impl Priority {
    /// Look up a priority level; `None` above `0x03`.
    #[must_use]
    pub const fn from_u8(level: u8) -> Option<Self> {
        match level {
            0x00 => Some(Self::Immediate),
            0x01 => Some(Self::High),
            0x02 => Some(Self::Medium),
            0x03 => Some(Self::Low),
            _ => None,
        }
    }

    /// Numeric level.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

bitflags! {
    /// Raw bit layout of the options byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct OptionFlags: u8 {
        /// 3-bit reliability code
        const RELIABILITY = 0b1110_0000;

        /// Message is one fragment of a larger one
        const HAS_SPLIT = 0b0001_0000;
    }
}

impl OptionFlags {
    /// Wrap a raw byte, keeping unknown bits.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    /// The 3-bit reliability code.
    #[must_use]
    pub const fn reliability_code(self) -> u8 {
        (self.bits() & Self::RELIABILITY.bits()) >> RELIABILITY_SHIFT
    }
}

/// Decoded options byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageOptions {
    /// Delivery class
    pub reliability: Reliability,
    /// Whether the message is split across datagrams
    pub has_split: bool,
}

impl MessageOptions {
    /// Options with the given reliability and no split.
    #[must_use]
    pub const fn new(reliability: Reliability) -> Self {
        Self { reliability, has_split: false }
    }

    /// Wire byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut byte = self.reliability.to_u8() << RELIABILITY_SHIFT;
        if self.has_split {
            byte |= OptionFlags::HAS_SPLIT.bits();
        }
        byte
    }

    /// Parse a wire byte. Every byte is valid; the low 4 bits are ignored.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        let flags = OptionFlags::from_byte(byte);
        Self {
            reliability: Reliability::from_code_bits(flags.reliability_code()),
            has_split: flags.contains(OptionFlags::HAS_SPLIT),
        }
    }
}

impl fmt::Display for MessageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.reliability)?;
        if self.has_split {
            f.write_str("+split")?;
        }
        Ok(())
    }
}

/// One-byte [`MessageOptions`] field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OptionsField;

impl Field for OptionsField {
    type Value = MessageOptions;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<MessageOptions> {
        let [byte] = cursor.read_array()?;
        Ok(MessageOptions::from_byte(byte))
    }

    fn encode(&self, value: &MessageOptions, dst: &mut impl BufMut) -> Result<()> {
        dst.put_u8(value.to_byte());
        Ok(())
    }
}
