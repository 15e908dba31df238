//! Wire codec for RakNet offline handshake datagrams.
//!
//! A datagram is one ID byte followed by a fixed sequence of typed fields.
//! Fields are small stateless codecs ([`fields`]); packet layouts compose them
//! in wire order ([`packet`]); the registry picks the layout from the first
//! byte and decodes the rest ([`registry`]).
//!
//! Decoding is strict. Every field is range-checked, the offline magic must
//! match, and a datagram with bytes left over after its last field is
//! rejected. Encoding mirrors decoding slot for slot, so anything that
//! decodes re-encodes to the same bytes (MTU padding and widened ack ranges
//! aside, which are normalized on decode).
//!
//! # Security
//!
//! Input is untrusted datagram payload. No decode path panics or allocates
//! more than the input can justify: string lengths are bounded by the
//! `u16` prefix and checked against the bytes actually present, and range
//! lists reserve capacity from the remaining length, not the declared count.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod consts;
pub mod cursor;
pub mod errors;
pub mod fields;
pub mod packet;
pub mod packets;
pub mod registry;

pub use consts::MAGIC;
pub use cursor::ByteCursor;
pub use errors::{ProtocolError, Result};
pub use fields::Field;
pub use packet::{Packet, Slot};
pub use packets::AnyPacket;
pub use registry::{PacketRegistry, decode_packet, registry};
