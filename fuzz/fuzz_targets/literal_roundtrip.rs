#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pgc_types::{LiteralDataPacket, LiteralFormat};

#[derive(Arbitrary, Debug)]
struct Input {
    format: u8,
    filename: Vec<u8>,
    date: u32,
    data: Vec<u8>,
}

// Fuzz target: literal packet encode->decode roundtrip.
//
// Filenames over 255 bytes must be rejected on encode; everything else
// must decode back to the same packet.
fuzz_target!(|input: Input| {
    let format = match input.format % 4 {
        0 => LiteralFormat::Binary,
        1 => LiteralFormat::Text,
        2 => LiteralFormat::Utf8,
        _ => LiteralFormat::Mime,
    };
    let packet = LiteralDataPacket {
        format,
        filename: input.filename,
        date: input.date,
        data: input.data,
    };

    match packet.encode_body() {
        Ok(body) => assert_eq!(LiteralDataPacket::decode_body(&body).unwrap(), packet),
        Err(_) => assert!(packet.filename.len() > 255),
    }
});
