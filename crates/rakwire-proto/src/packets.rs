//! The offline handshake packet set.
//!
//! # Flow
//!
//! ```text
//! client                                  server
//!   UnconnectedPing            ──────▶
//!                              ◀──────    UnconnectedPong
//!   OpenConnectionRequest1     ──────▶              (padded to probe MTU)
//!                              ◀──────    OpenConnectionReply1
//!   OpenConnectionRequest2     ──────▶
//!                              ◀──────    OpenConnectionReply2
//!   ConnectionRequest          ──────▶
//! ```
//!
//! `Acknowledge` / `Unacknowledge` carry datagram sequence ranges once a
//! session exists.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::{
    consts::MTU_PADDING_OFFSET,
    errors::Result,
    fields::{
        AddressField, BoolField, ByteField, LongLongField, PaddingField, RangeListField,
        StringField, UnsignedShortField,
    },
    packet::{Packet, packet},
    registry::PacketRegistry,
};

packet! {
    /// Keepalive ping inside an established session
    ConnectedPing = 0x00 {
        /// Sender's timestamp, echoed in the pong
        ping_id: LongLongField,
    }
}

packet! {
    /// Server discovery probe
    UnconnectedPing = 0x01 {
        /// Sender's timestamp, echoed in the pong
        ping_id: LongLongField,
        @magic,
        /// Client identifier
        client_guid: LongLongField,
    }
}

packet! {
    /// Discovery probe answered only by servers with free slots
    UnconnectedPingOpenConnections = 0x02 {
        /// Sender's timestamp, echoed in the pong
        ping_id: LongLongField,
        @magic,
        /// Client identifier
        client_guid: LongLongField,
    }
}

packet! {
    /// Answer to [`ConnectedPing`]
    ConnectedPong = 0x03 {
        /// Timestamp copied from the ping
        ping_id: LongLongField,
    }
}

packet! {
    /// First connection attempt; the datagram size is the MTU being probed
    OpenConnectionRequest1 = 0x05 {
        @magic,
        /// Protocol version spoken by the client
        protocol: ByteField,
        /// Total datagram size, recovered from the zero padding
        mtu_size: PaddingField = PaddingField::new(MTU_PADDING_OFFSET),
    }
}

packet! {
    /// Server answer to [`OpenConnectionRequest1`]
    OpenConnectionReply1 = 0x06 {
        @magic,
        /// Server identifier
        server_guid: LongLongField,
        /// Whether the server requires a secured session
        use_security: BoolField,
        /// MTU accepted by the server
        mtu_size: UnsignedShortField,
    }
}

packet! {
    /// Second connection attempt with the negotiated MTU
    OpenConnectionRequest2 = 0x07 {
        @magic,
        /// Address the client is connecting to
        server_address: AddressField,
        /// Negotiated MTU
        mtu_size: UnsignedShortField,
        /// Client identifier
        client_guid: LongLongField,
    }
}

packet! {
    /// Server answer to [`OpenConnectionRequest2`]
    OpenConnectionReply2 = 0x08 {
        @magic,
        /// Server identifier
        server_guid: LongLongField,
        /// Address the server sees the client at
        address: AddressField,
        /// Final MTU
        mtu_size: UnsignedShortField,
        /// Whether the session is secured
        use_security: BoolField,
    }
}

packet! {
    /// Opens the session once the MTU is agreed
    ConnectionRequest = 0x09 {
        /// Client identifier
        client_guid: LongLongField,
        /// Client timestamp
        send_ping: LongLongField,
        /// Whether the client asks for a secured session
        use_security: BoolField,
    }
}

packet! {
    /// Answer to [`UnconnectedPing`], advertising the server
    UnconnectedPong = 0x1c {
        /// Timestamp copied from the ping
        ping_id: LongLongField,
        /// Server identifier
        server_guid: LongLongField,
        @magic,
        /// Free-form server description
        server_name: StringField,
    }
}

packet! {
    /// Unsolicited server advertisement, same layout as [`UnconnectedPong`]
    AdvertiseSystem = 0x1d {
        /// Server timestamp
        ping_id: LongLongField,
        /// Server identifier
        server_guid: LongLongField,
        @magic,
        /// Free-form server description
        server_name: StringField,
    }
}

packet! {
    /// Negative acknowledgement of datagram sequence numbers
    Unacknowledge = 0xa0 {
        /// Sequence numbers reported missing
        packet_ranges: RangeListField,
    }
}

packet! {
    /// Positive acknowledgement of datagram sequence numbers
    Acknowledge = 0xc0 {
        /// Sequence numbers received
        packet_ranges: RangeListField,
    }
}

macro_rules! define_packets {
    ($($name:ident),* $(,)?) => {
        /// A decoded packet of any handshake type.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum AnyPacket {
            $(
                #[doc = concat!("[`", stringify!($name), "`]")]
                $name($name),
            )*
        }

        impl AnyPacket {
            /// Leading ID byte of the wrapped packet.
            #[must_use]
            pub const fn id(&self) -> u8 {
                match self {
                    $(Self::$name(_) => <$name as Packet>::ID,)*
                }
            }

            /// Type name of the wrapped packet.
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$name(_) => <$name as Packet>::NAME,)*
                }
            }

            /// Encode the wrapped packet, ID byte included.
            pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
                match self {
                    $(Self::$name(packet) => packet.encode(dst),)*
                }
            }

            pub(crate) fn register_all(registry: &mut PacketRegistry<Self>) -> Result<()> {
                $(registry.register::<$name>()?;)*
                Ok(())
            }
        }

        $(
            impl From<$name> for AnyPacket {
                fn from(packet: $name) -> Self {
                    Self::$name(packet)
                }
            }
        )*

        impl fmt::Display for AnyPacket {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$name(packet) => fmt::Display::fmt(packet, f),)*
                }
            }
        }
    };
}

define_packets!(
    ConnectedPing,
    UnconnectedPing,
    UnconnectedPingOpenConnections,
    ConnectedPong,
    OpenConnectionRequest1,
    OpenConnectionReply1,
    OpenConnectionRequest2,
    OpenConnectionReply2,
    ConnectionRequest,
    UnconnectedPong,
    AdvertiseSystem,
    Unacknowledge,
    Acknowledge,
);

impl AnyPacket {
    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}
