#![no_main]

use libfuzzer_sys::fuzz_target;
use pgc_types::{CompressedDataPacket, DecodeLimits};

// Fuzz target: compressed-data body decoding.
//
// Calls `CompressedDataPacket::read_with_limits` on arbitrary bytes with
// small limits so bombs and deep nesting are hit quickly.
// Catches bugs in:
// - Algorithm octet dispatch
// - zlib header, dictionary and Adler-32 checks
// - Raw inflate and the size cap
// - Nested packet parsing and the depth cap
//
// Any packet that reads must write back to the same bytes.
fuzz_target!(|data: &[u8]| {
    let limits = DecodeLimits {
        max_decompressed_size: 1 << 20,
        max_nesting_depth: 8,
    };
    if let Ok(packet) = CompressedDataPacket::read_with_limits(data, &limits) {
        assert_eq!(packet.write().unwrap(), data);
    }
});
