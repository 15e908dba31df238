//! Protocol constants shared by the field codecs and packet layouts.

/// Offline message magic.
///
/// Every unconnected handshake datagram carries these 16 bytes so a server
/// can tell handshake traffic apart from session datagrams.
pub const MAGIC: [u8; 16] = [
    0x00, 0xff, 0xff, 0x00, 0xfe, 0xfe, 0xfe, 0xfe, 0xfd, 0xfd, 0xfd, 0xfd, 0x12, 0x34, 0x56, 0x78,
];

/// Minimum span of a non-single acknowledgement range.
///
/// A decoded range whose end lies closer than this to its start is widened.
pub const RANGE_MIN_SPAN: u32 = 512;

/// Bytes of a datagram that precede the MTU padding in
/// `OpenConnectionRequest1`: the ID byte, the magic and the protocol byte.
pub const MTU_PADDING_OFFSET: usize = 18;
