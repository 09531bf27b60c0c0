//! Shared fixtures for the integration tests and benchmarks.
//!
//! The writer can only produce uncompressed containers, so zip and zlib
//! bodies are built here with `flate2`.

use std::io::Write;

use flate2::Compression;
use flate2::write::{DeflateEncoder, ZlibEncoder};
use pgc_types::CompressionAlgorithm;
use pgc_wire::PacketFrame;

/// A single literal packet: format 'b', filename "hi.txt", date 0,
/// data "hello, compressed world\n".
pub const LITERAL_STREAM: &str =
    "cb24620668692e7478740000000068656c6c6f2c20636f6d7072657373656420776f726c640a";

/// [`LITERAL_STREAM`] compressed with raw DEFLATE.
pub const LITERAL_STREAM_DEFLATED: &str =
    "3bad92c49691a9575251c2000419a93939f93a0ac9f9b90545a9c5c5a9290ae5f94539295c00";

/// Decode a hex fixture.
///
/// # Panics
///
/// If `hex_str` is not valid hex.
pub fn fixture(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap_or_else(|e| panic!("bad fixture {hex_str}: {e}"))
}

/// Compressed-data body (algorithm octet included) for `plain`.
///
/// # Panics
///
/// For `Bzip2`, which has no encoder here either.
pub fn compressed_body(algorithm: CompressionAlgorithm, plain: &[u8]) -> Vec<u8> {
    let head = vec![algorithm.to_wire_byte()];
    match algorithm {
        CompressionAlgorithm::Uncompressed => [head, plain.to_vec()].concat(),
        CompressionAlgorithm::Zip => {
            let mut encoder = DeflateEncoder::new(head, Compression::default());
            encoder.write_all(plain).unwrap();
            encoder.finish().unwrap()
        }
        CompressionAlgorithm::Zlib => {
            let mut encoder = ZlibEncoder::new(head, Compression::default());
            encoder.write_all(plain).unwrap();
            encoder.finish().unwrap()
        }
        CompressionAlgorithm::Bzip2 => panic!("no bzip2 encoder"),
    }
}

/// A complete packet: new-format header plus `body`.
pub fn frame(tag: u8, body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::new();
    PacketFrame { tag, body }.write_to(&mut out).unwrap();
    out
}
