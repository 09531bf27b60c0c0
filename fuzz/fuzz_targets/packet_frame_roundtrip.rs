#![no_main]

use libfuzzer_sys::fuzz_target;
use pgc_wire::PacketFrame;
use pgc_wire::packet_frame::tag;

// Fuzz target: PacketFrame write->read roundtrip.
//
// Input format:
//   byte 0: tag (masked to 6 bits)
//   bytes 1..: body
fuzz_target!(|data: &[u8]| {
    let Some((&first, body)) = data.split_first() else {
        return;
    };

    let frame = PacketFrame {
        tag: first & tag::MAX,
        body: body.to_vec(),
    };

    let mut wire = Vec::new();
    let written = frame.write_to(&mut wire).unwrap();
    assert_eq!(written, wire.len());

    let (parsed, consumed) = PacketFrame::read_from(&wire).unwrap();
    assert_eq!(parsed, frame);
    assert_eq!(consumed, wire.len());
});
