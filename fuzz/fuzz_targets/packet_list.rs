#![no_main]

use libfuzzer_sys::fuzz_target;
use pgc_types::{DecodeLimits, PacketList};

// Fuzz target: full packet stream parsing.
//
// A parsed list is written and parsed again; the two parses must agree
// even when the input used old-format or partial-length headers.
fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits {
        max_decompressed_size: 1 << 20,
        max_nesting_depth: 8,
    };
    let Ok(list) = PacketList::read_with_limits(data, &limits) else {
        return;
    };
    let Ok(written) = list.write() else {
        return;
    };
    let reparsed = PacketList::read_with_limits(&written, &limits).unwrap();
    assert_eq!(reparsed, list);
});
