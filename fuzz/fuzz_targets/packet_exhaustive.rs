//! Positive space fuzzer: every packet ID with a fuzzed body.
//!
//! Random datagrams rarely start with a registered ID, so this target
//! prefixes the input with each ID in turn to reach every layout.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rakwire_proto::{MAGIC, decode_packet};

const IDS: &[u8] = &[
    0x00, 0x01, 0x02, 0x03, 0x05, 0x06, 0x07, 0x08, 0x09, 0x1c, 0x1d, 0xa0, 0xc0,
];

// Where each layout expects the magic, if anywhere
fn magic_offset(id: u8) -> Option<usize> {
    match id {
        0x01 | 0x02 => Some(9),
        0x05..=0x08 => Some(1),
        0x1c | 0x1d => Some(17),
        _ => None,
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let id = IDS[selector as usize % IDS.len()];

    let mut datagram = vec![id];
    datagram.extend_from_slice(body);

    // Splice in the magic so decoding gets past it
    if let Some(offset) = magic_offset(id) {
        let end = offset + MAGIC.len();
        if datagram.len() < end {
            datagram.resize(end, 0);
        }
        datagram[offset..end].copy_from_slice(&MAGIC);
    }

    if let Ok(packet) = decode_packet(&datagram) {
        assert_eq!(packet.id(), id);
        if let Ok(encoded) = packet.to_bytes() {
            assert_eq!(decode_packet(&encoded).ok(), Some(packet));
        }
    }
});
