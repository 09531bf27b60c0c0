#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: PacketFrame::read_from on arbitrary input.
//
// Exercises new-format lengths (one, two and five octets, partial
// chunks) and old-format headers including indeterminate length.
fuzz_target!(|data: &[u8]| {
    if let Ok((frame, consumed)) = pgc_wire::PacketFrame::read_from(data) {
        assert!(consumed <= data.len());
        assert!(frame.body.len() <= consumed);
    }
});
