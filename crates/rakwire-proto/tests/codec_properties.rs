//! Property-based tests for the packet codec.
//!
//! - Arbitrary datagrams never panic the decoder
//! - Anything that decodes re-encodes to bytes that decode to the same packet
//! - Valid packets round-trip through the registry

use proptest::prelude::*;
use rakwire_proto::{
    AnyPacket, Packet, decode_packet,
    fields::{Address, Range},
    packets::{
        Acknowledge, OpenConnectionReply2, OpenConnectionRequest1, UnconnectedPing,
        UnconnectedPong,
    },
};

// Signed fields reject their most negative value on encode
fn guid_strategy() -> impl Strategy<Value = i64> {
    -i64::MAX..=i64::MAX
}

fn address_strategy() -> impl Strategy<Value = Address> {
    (any::<[u8; 4]>(), any::<u16>()).prop_map(|(octets, port)| Address::new(octets.into(), port))
}

// Ranges as the decoder produces them: single, or spanning at least 512
fn range_strategy() -> impl Strategy<Value = Range> {
    prop_oneof![
        (0u32..=0xFF_FFFF).prop_map(Range::single),
        (0u32..=0xFF_FDFF, 512u32..=0x1_0000)
            .prop_map(|(min, span)| Range::new(min, (min + span).min(0xFF_FFFF))),
    ]
}

fn packet_strategy() -> impl Strategy<Value = AnyPacket> {
    prop_oneof![
        (guid_strategy(), guid_strategy())
            .prop_map(|(ping_id, client_guid)| AnyPacket::from(UnconnectedPing { ping_id, client_guid })),
        (guid_strategy(), guid_strategy(), ".{0,64}").prop_map(|(ping_id, server_guid, server_name)| {
            AnyPacket::from(UnconnectedPong { ping_id, server_guid, server_name })
        }),
        (-127i8..=127, 18usize..=1500)
            .prop_map(|(protocol, mtu_size)| AnyPacket::from(OpenConnectionRequest1 { protocol, mtu_size })),
        (guid_strategy(), address_strategy(), any::<u16>(), any::<bool>()).prop_map(
            |(server_guid, address, mtu_size, use_security)| {
                AnyPacket::from(OpenConnectionReply2 {
                    server_guid,
                    address,
                    mtu_size,
                    use_security,
                })
            }
        ),
        prop::collection::vec(range_strategy(), 0..16)
            .prop_map(|packet_ranges| AnyPacket::from(Acknowledge { packet_ranges })),
    ]
}

#[test]
fn prop_arbitrary_bytes_never_panic() {
    proptest!(|(data in prop::collection::vec(any::<u8>(), 0..256))| {
        let _ = decode_packet(&data);
    });
}

#[test]
fn prop_arbitrary_bodies_never_panic() {
    let ids = [0x00u8, 0x01, 0x02, 0x03, 0x05, 0x06, 0x07, 0x08, 0x09, 0x1c, 0x1d, 0xa0, 0xc0];
    proptest!(|(id in prop::sample::select(ids.to_vec()), body in prop::collection::vec(any::<u8>(), 0..128))| {
        let mut data = vec![id];
        data.extend_from_slice(&body);
        let _ = decode_packet(&data);
    });
}

#[test]
fn prop_decode_encode_is_stable() {
    proptest!(|(data in prop::collection::vec(any::<u8>(), 0..64))| {
        if let Ok(packet) = decode_packet(&data)
            && let Ok(encoded) = packet.to_bytes()
        {
            prop_assert_eq!(decode_packet(&encoded), Ok(packet));
        }
    });
}

#[test]
fn prop_valid_packets_round_trip() {
    proptest!(|(packet in packet_strategy())| {
        let encoded = packet.to_bytes().expect("generated packets are encodable");
        prop_assert_eq!(encoded[0], packet.id());
        prop_assert_eq!(decode_packet(&encoded), Ok(packet));
    });
}

#[test]
fn prop_mtu_probe_size_matches_datagram() {
    proptest!(|(mtu_size in 18usize..=1500)| {
        let request = OpenConnectionRequest1 { protocol: 10, mtu_size };
        let encoded = request.to_bytes().unwrap();
        prop_assert_eq!(encoded.len(), mtu_size);
    });
}
