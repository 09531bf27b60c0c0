use std::fmt;

use adler2::Adler32;
use flate2::{Decompress, FlushDecompress, Status};
use tracing::debug;

use crate::enums::CompressionAlgorithm;
use crate::error::PacketError;

/// zlib compression method number for DEFLATE (RFC 1950 §2.2).
const ZLIB_METHOD_DEFLATE: u8 = 8;

/// zlib CMF + FLG header bytes.
const ZLIB_HEADER_LEN: usize = 2;

/// zlib Adler-32 trailer bytes.
const ZLIB_TRAILER_LEN: usize = 4;

/// FLG bit 5: a preset dictionary identifier follows the header.
const ZLIB_FLAG_FDICT: u8 = 0b0010_0000;

/// Smallest output capacity an inflate step asks for.
const INFLATE_CHUNK: usize = 32 * 1024;

/// Which way a transform runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => f.write_str("decode"),
            Self::Encode => f.write_str("encode"),
        }
    }
}

/// A compression back end bound to one [`CompressionAlgorithm`].
///
/// The compressed-data packet never inflates anything itself: it looks
/// up the back end for its algorithm with [`codec_for`] and hands it the
/// payload. Back ends that have no transform in a direction return
/// [`PacketError::NotImplemented`]; the default `encode` does exactly
/// that.
///
/// # Thread Safety
///
/// Back ends are stateless and shared as `&'static` values, so they must
/// be `Send + Sync`.
pub trait CompressionCodec: Send + Sync {
    /// The algorithm this back end implements.
    fn algorithm(&self) -> CompressionAlgorithm;

    /// Recover the inner packet stream from a compressed payload.
    ///
    /// `limit` bounds the size of the output; exceeding it returns
    /// [`PacketError::DecompressionBomb`].
    ///
    /// # Errors
    ///
    /// Any [`PacketError`] describing why the payload cannot be decoded.
    fn decode(&self, payload: &[u8], limit: usize) -> Result<Vec<u8>, PacketError>;

    /// Produce a compressed payload from a serialized packet stream.
    ///
    /// # Errors
    ///
    /// [`PacketError::NotImplemented`] unless the back end overrides it.
    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, PacketError> {
        let _ = plain;
        Err(PacketError::NotImplemented {
            algorithm: self.algorithm(),
            direction: Direction::Encode,
        })
    }
}

/// Look up the back end for an algorithm.
///
/// ```text
/// ┌──────────────┬──────────────────────────┬────────────────┐
/// │ Algorithm    │ decode                   │ encode         │
/// ├──────────────┼──────────────────────────┼────────────────┤
/// │ Uncompressed │ identity                 │ identity       │
/// │ Zip          │ raw inflate              │ NotImplemented │
/// │ Zlib         │ header check + inflate + │ NotImplemented │
/// │              │ Adler-32 verification    │                │
/// │ Bzip2        │ NotImplemented           │ NotImplemented │
/// └──────────────┴──────────────────────────┴────────────────┘
/// ```
pub fn codec_for(algorithm: CompressionAlgorithm) -> &'static dyn CompressionCodec {
    match algorithm {
        CompressionAlgorithm::Uncompressed => &Identity,
        CompressionAlgorithm::Zip => &RawDeflate,
        CompressionAlgorithm::Zlib => &Zlib,
        CompressionAlgorithm::Bzip2 => &Bzip2,
    }
}

/// Algorithm 0: the payload is the packet stream.
pub struct Identity;

impl CompressionCodec for Identity {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Uncompressed
    }

    fn decode(&self, payload: &[u8], limit: usize) -> Result<Vec<u8>, PacketError> {
        if payload.len() > limit {
            return Err(PacketError::DecompressionBomb { limit });
        }
        Ok(payload.to_vec())
    }

    fn encode(&self, plain: &[u8]) -> Result<Vec<u8>, PacketError> {
        Ok(plain.to_vec())
    }
}

/// Algorithm 1 (ZIP): raw DEFLATE with no wrapper. The stream must end
/// exactly at the end of the payload.
pub struct RawDeflate;

impl CompressionCodec for RawDeflate {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Zip
    }

    fn decode(&self, payload: &[u8], limit: usize) -> Result<Vec<u8>, PacketError> {
        let inflated = inflate_raw(payload, limit)?;
        debug!(
            compressed = payload.len(),
            inflated = inflated.len(),
            "inflated zip payload"
        );
        Ok(inflated)
    }
}

/// Algorithm 2 (ZLIB): DEFLATE inside a 2-byte header and Adler-32 trailer.
///
/// ```text
/// ┌─────┬─────┬────────────────────────┬─────────────────────┐
/// │ CMF │ FLG │ DEFLATE data           │ Adler-32 (BE, 4)    │
/// └─────┴─────┴────────────────────────┴─────────────────────┘
///   low nibble of CMF = method, must be 8
/// ```
pub struct Zlib;

impl CompressionCodec for Zlib {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Zlib
    }

    fn decode(&self, payload: &[u8], limit: usize) -> Result<Vec<u8>, PacketError> {
        // The method nibble is checked before anything else about the stream.
        let cmf = *payload
            .first()
            .ok_or(PacketError::TruncatedZlibStream { len: 0 })?;
        let method = cmf & 0x0F;
        if method != ZLIB_METHOD_DEFLATE {
            return Err(PacketError::UnsupportedCompressionMethod { method });
        }

        if payload.len() < ZLIB_HEADER_LEN + ZLIB_TRAILER_LEN {
            return Err(PacketError::TruncatedZlibStream { len: payload.len() });
        }

        let flg = payload[1];
        if ((u16::from(cmf) << 8) | u16::from(flg)) % 31 != 0 {
            return Err(PacketError::InvalidZlibHeader { cmf, flg });
        }
        if flg & ZLIB_FLAG_FDICT != 0 {
            return Err(PacketError::PresetDictionaryUnsupported);
        }

        let body_len = payload.len() - ZLIB_HEADER_LEN - ZLIB_TRAILER_LEN;
        let (data, trailer) = payload[ZLIB_HEADER_LEN..].split_at(body_len);
        let inflated = inflate_raw(data, limit)?;

        let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        let mut hasher = Adler32::new();
        hasher.write_slice(&inflated);
        let actual = hasher.checksum();
        if expected != actual {
            return Err(PacketError::ChecksumMismatch { expected, actual });
        }

        debug!(
            compressed = payload.len(),
            inflated = inflated.len(),
            "inflated zlib payload"
        );
        Ok(inflated)
    }
}

/// Algorithm 3 (BZip2): recognized, but no transform exists.
pub struct Bzip2;

impl CompressionCodec for Bzip2 {
    fn algorithm(&self) -> CompressionAlgorithm {
        CompressionAlgorithm::Bzip2
    }

    fn decode(&self, _payload: &[u8], _limit: usize) -> Result<Vec<u8>, PacketError> {
        Err(PacketError::NotImplemented {
            algorithm: CompressionAlgorithm::Bzip2,
            direction: Direction::Decode,
        })
    }
}

/// Inflate a raw DEFLATE stream that must occupy all of `data`.
///
/// The output buffer doubles, starting at [`INFLATE_CHUNK`], but is never
/// grown past `limit + 1` bytes, so an oversized stream is stopped as soon
/// as it crosses the limit. A stream that ends early, or is followed by
/// unread bytes, is rejected.
fn inflate_raw(data: &[u8], limit: usize) -> Result<Vec<u8>, PacketError> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::new();

    loop {
        let consumed = total_in(&inflater, data);
        let produced = out.len();
        let room = produced.max(INFLATE_CHUNK).min(limit.saturating_add(1) - produced);
        out.reserve_exact(room);

        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| PacketError::InflateFailed(e.to_string()))?;
        if out.len() > limit {
            return Err(PacketError::DecompressionBomb { limit });
        }

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError
                if total_in(&inflater, data) == consumed && out.len() == produced =>
            {
                return Err(PacketError::InflateFailed("truncated deflate stream".into()));
            }
            Status::Ok | Status::BufError => {}
        }
    }

    let trailing = data.len() - total_in(&inflater, data);
    if trailing > 0 {
        return Err(PacketError::InflateFailed(format!(
            "{trailing} bytes after end of deflate stream"
        )));
    }
    Ok(out)
}

fn total_in(inflater: &Decompress, data: &[u8]) -> usize {
    usize::try_from(inflater.total_in()).map_or(data.len(), |n| n.min(data.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024 * 1024;

    fn fixture(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str).unwrap()
    }

    // ── Identity ──────────────────────────────────────────────────────

    #[test]
    fn identity_is_verbatim_both_ways() {
        let codec = codec_for(CompressionAlgorithm::Uncompressed);
        assert_eq!(codec.decode(b"abc", LIMIT).unwrap(), b"abc");
        assert_eq!(codec.encode(b"abc").unwrap(), b"abc");
    }

    #[test]
    fn identity_respects_limit() {
        let codec = codec_for(CompressionAlgorithm::Uncompressed);
        assert!(matches!(
            codec.decode(b"abcd", 3),
            Err(PacketError::DecompressionBomb { limit: 3 })
        ));
    }

    // ── Zip ───────────────────────────────────────────────────────────

    #[test]
    fn zip_inflates_raw_deflate() {
        let raw = fixture("cb48cdc9c90700");
        let codec = codec_for(CompressionAlgorithm::Zip);
        assert_eq!(codec.decode(&raw, LIMIT).unwrap(), b"hello");
    }

    #[test]
    fn zip_rejects_reserved_block_type() {
        // BFINAL=1, BTYPE=11 is reserved in RFC 1951
        let codec = codec_for(CompressionAlgorithm::Zip);
        assert!(matches!(
            codec.decode(&[0xFF; 8], LIMIT),
            Err(PacketError::InflateFailed(_))
        ));
    }

    #[test]
    fn zip_rejects_bytes_after_stream() {
        let mut raw = fixture("cb48cdc9c90700");
        raw.extend_from_slice(b"junk");
        let codec = codec_for(CompressionAlgorithm::Zip);
        assert!(matches!(
            codec.decode(&raw, LIMIT),
            Err(PacketError::InflateFailed(msg)) if msg == "4 bytes after end of deflate stream"
        ));
    }

    #[test]
    fn zip_rejects_truncated_stream() {
        let raw = fixture("cb48cdc9c90700");
        let codec = codec_for(CompressionAlgorithm::Zip);
        assert!(matches!(
            codec.decode(&raw[..4], LIMIT),
            Err(PacketError::InflateFailed(_))
        ));
    }

    #[test]
    fn zip_enforces_limit() {
        let raw = fixture("cb48cdc9c90700");
        let codec = codec_for(CompressionAlgorithm::Zip);
        assert!(matches!(
            codec.decode(&raw, 4),
            Err(PacketError::DecompressionBomb { limit: 4 })
        ));
        assert_eq!(codec.decode(&raw, 5).unwrap(), b"hello");
    }

    // ── Zlib ──────────────────────────────────────────────────────────

    #[test]
    fn zlib_inflates_and_verifies_checksum() {
        let stream = fixture("789ccb48cdc9c90700062c0215");
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert_eq!(codec.decode(&stream, LIMIT).unwrap(), b"hello");
    }

    #[test]
    fn zlib_rejects_bytes_between_stream_and_trailer() {
        // "hello" stream, 3 junk bytes, then the correct Adler-32
        let stream = fixture("789ccb48cdc9c90700aaaaaa062c0215");
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert!(matches!(
            codec.decode(&stream, LIMIT),
            Err(PacketError::InflateFailed(msg)) if msg == "3 bytes after end of deflate stream"
        ));
    }

    #[test]
    fn zlib_checksum_mismatch() {
        let stream = fixture("789ccb48cdc9c90700062c0216");
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert!(matches!(
            codec.decode(&stream, LIMIT),
            Err(PacketError::ChecksumMismatch {
                expected: 0x062C_0216,
                actual: 0x062C_0215
            })
        ));
    }

    #[test]
    fn zlib_method_nibble_checked_first() {
        let codec = codec_for(CompressionAlgorithm::Zlib);
        for first in [0x79, 0x07, 0x0F, 0x00] {
            let result = codec.decode(&[first], LIMIT);
            assert!(
                matches!(
                    result,
                    Err(PacketError::UnsupportedCompressionMethod { method }) if method == first & 0x0F
                ),
                "first byte {first:#04X}"
            );
        }
    }

    #[test]
    fn zlib_empty_payload_is_truncated() {
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert!(matches!(
            codec.decode(&[], LIMIT),
            Err(PacketError::TruncatedZlibStream { len: 0 })
        ));
    }

    #[test]
    fn zlib_short_payload_is_truncated() {
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert!(matches!(
            codec.decode(&[0x78, 0x9C, 0x00], LIMIT),
            Err(PacketError::TruncatedZlibStream { len: 3 })
        ));
    }

    #[test]
    fn zlib_header_check_bits() {
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert!(matches!(
            codec.decode(&[0x78, 0x9D, 0, 0, 0, 0], LIMIT),
            Err(PacketError::InvalidZlibHeader { cmf: 0x78, flg: 0x9D })
        ));
    }

    #[test]
    fn zlib_preset_dictionary_rejected() {
        let codec = codec_for(CompressionAlgorithm::Zlib);
        assert!(matches!(
            codec.decode(&[0x78, 0xBB, 0, 0, 0, 0], LIMIT),
            Err(PacketError::PresetDictionaryUnsupported)
        ));
    }

    // ── Bzip2 and encode paths ────────────────────────────────────────

    #[test]
    fn bzip2_decode_not_implemented() {
        let codec = codec_for(CompressionAlgorithm::Bzip2);
        assert!(matches!(
            codec.decode(b"BZh9", LIMIT),
            Err(PacketError::NotImplemented {
                algorithm: CompressionAlgorithm::Bzip2,
                direction: Direction::Decode
            })
        ));
    }

    #[test]
    fn real_algorithms_cannot_encode() {
        for algorithm in [
            CompressionAlgorithm::Zip,
            CompressionAlgorithm::Zlib,
            CompressionAlgorithm::Bzip2,
        ] {
            let result = codec_for(algorithm).encode(b"payload");
            assert!(
                matches!(
                    result,
                    Err(PacketError::NotImplemented { algorithm: a, direction: Direction::Encode }) if a == algorithm
                ),
                "{algorithm} should not encode"
            );
        }
    }

    #[test]
    fn dispatch_table_is_keyed_by_algorithm() {
        for algorithm in CompressionAlgorithm::ALL {
            assert_eq!(codec_for(algorithm).algorithm(), algorithm);
        }
    }

    #[test]
    fn not_implemented_message() {
        let err = codec_for(CompressionAlgorithm::Zlib).encode(b"").unwrap_err();
        assert_eq!(err.to_string(), "zlib encode is not implemented");
    }
}
