//! Random datagram fuzzer for registry dispatch.
//!
//! Decoding must never panic. When a datagram decodes and re-encodes, the
//! re-encoded bytes must decode to the same packet.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rakwire_proto::decode_packet;

fuzz_target!(|data: &[u8]| {
    let Ok(packet) = decode_packet(data) else {
        return;
    };

    let Ok(encoded) = packet.to_bytes() else {
        return;
    };

    let reparsed = decode_packet(&encoded).expect("re-encoded packet should decode");
    assert_eq!(reparsed, packet, "decode(encode(p)) changed the packet");
});
