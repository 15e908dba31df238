//! Error types for the RakNet offline codec.
//!
//! All errors are structured, testable, and carry the values needed to tell
//! what went wrong on the wire.

use thiserror::Error;

/// Errors raised while decoding or encoding datagrams and their fields.
///
/// Nothing in this crate recovers from these internally except
/// [`Optional`](crate::fields::Optional), which turns an exhausted cursor into
/// an absent value. A packet is either fully valid or rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    // Cursor errors
    /// A read asked for more bytes than the buffer still holds
    #[error("end of stream: requested {requested} bytes, {remaining} remaining")]
    EndOfStream {
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left in the buffer
        remaining: usize,
    },

    // Encoding errors
    /// A numeric value does not fit the range of its field
    #[error("value {value} out of range [{min}, {max}]")]
    Overflow {
        /// Value handed to the encoder
        value: i128,
        /// Smallest value the field accepts
        min: i128,
        /// Largest value the field accepts
        max: i128,
    },

    // Packet framing errors
    /// The declared structure was fully decoded but bytes are left over
    #[error("{remaining} bytes left after decoding the packet structure")]
    RemainingData {
        /// Number of unconsumed bytes
        remaining: usize,
    },

    /// No packet type is registered for the leading ID byte
    #[error("unknown packet id: {0:#04x}")]
    UnknownPacket(u8),

    /// A packet type was registered under an ID that is already taken
    #[error("packet id {0:#04x} already registered")]
    DuplicateId(u8),

    /// The leading ID byte does not belong to the packet being decoded
    #[error("packet id mismatch: expected {expected:#04x}, got {actual:#04x}")]
    PacketIdMismatch {
        /// ID declared by the packet schema
        expected: u8,
        /// ID found on the wire
        actual: u8,
    },

    // Malformed values
    /// The offline message magic did not match
    #[error("invalid offline magic: {found}")]
    InvalidMagic {
        /// Hex rendering of the bytes found in place of the magic
        found: String,
    },

    /// A string payload is not valid UTF-8
    #[error("invalid utf-8 in string field: {0}")]
    InvalidUtf8(String),
}

impl ProtocolError {
    /// Build an [`InvalidMagic`](Self::InvalidMagic) error from the offending
    /// bytes.
    pub(crate) fn invalid_magic(found: &[u8]) -> Self {
        Self::InvalidMagic { found: hex::encode(found) }
    }
}

/// Convenient Result type alias for codec operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
