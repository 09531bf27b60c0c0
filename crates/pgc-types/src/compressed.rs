use std::sync::OnceLock;

use pgc_wire::WireError;
use tracing::debug;

use crate::compression::codec_for;
use crate::enums::CompressionAlgorithm;
use crate::error::PacketError;
use crate::limits::{DecodeBudget, DecodeLimits};
use crate::packet_list::PacketList;

/// COMPRESSED DATA packet (tag 8): a compressed stream of other packets.
///
/// Body layout:
///
/// ```text
/// ┌────────┬───────────┬────────────────────────────────────────┐
/// │ Offset │ Size      │ Field                                  │
/// ├────────┼───────────┼────────────────────────────────────────┤
/// │ 0      │ 1         │ algorithm (0 none, 1 zip, 2 zlib, 3 bz)│
/// │ 1      │ remainder │ compressed packet stream               │
/// └────────┴───────────┴────────────────────────────────────────┘
/// ```
///
/// The packet holds two views of the same content: the raw payload (the
/// bytes after the algorithm octet, still compressed) and the decoded
/// [`PacketList`]. Their life cycle is asymmetric:
///
/// ```text
///   Empty ──read──▶ Decoded    raw payload + packets, both populated
///   Empty ──new───▶ Ready ──write──▶ Encoded    raw payload cached
/// ```
///
/// - [`read`](Self::read) is eager: it decompresses and parses the inner
///   stream before returning. There is no half-decoded packet.
/// - [`write`](Self::write) is lazy: it compresses only when no raw
///   payload is cached, and keeps the result for later writes. A packet
///   read from bytes therefore writes back byte-for-byte.
///
/// Mutating through [`packets_mut`](Self::packets_mut) or
/// [`set_algorithm`](Self::set_algorithm) drops the cached payload, so a
/// later `write` always reflects the current packets.
///
/// Equality compares the algorithm and the decoded packets; the cached
/// payload is not part of it. The cache is a [`OnceLock`], so a decoded
/// message can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct CompressedDataPacket {
    algorithm: CompressionAlgorithm,
    raw_payload: OnceLock<Vec<u8>>,
    packets: PacketList,
}

impl CompressedDataPacket {
    /// Create a `Ready` packet from an algorithm and its inner packets.
    #[must_use]
    pub fn new(algorithm: CompressionAlgorithm, packets: PacketList) -> Self {
        Self {
            algorithm,
            raw_payload: OnceLock::new(),
            packets,
        }
    }

    /// Parse a compressed-data body with the default [`DecodeLimits`].
    ///
    /// # Errors
    ///
    /// See [`read_with_limits`](Self::read_with_limits).
    pub fn read(body: &[u8]) -> Result<Self, PacketError> {
        Self::read_with_limits(body, &DecodeLimits::default())
    }

    /// Parse a compressed-data body: algorithm octet, raw payload, then
    /// eager decompression and nested parsing.
    ///
    /// # Errors
    ///
    /// - [`PacketError::Wire`] (`UnexpectedEof`) if `body` is empty.
    /// - [`PacketError::UnknownAlgorithm`] if the algorithm octet is not
    ///   0 to 3.
    /// - Anything [`decompress`](Self::decompress) or the nested packet
    ///   parse can return.
    pub fn read_with_limits(body: &[u8], limits: &DecodeLimits) -> Result<Self, PacketError> {
        Self::read_nested(body, &mut DecodeBudget::new(limits), 0)
    }

    /// `depth` counts the containers that enclose this one.
    pub(crate) fn read_nested(
        body: &[u8],
        budget: &mut DecodeBudget,
        depth: usize,
    ) -> Result<Self, PacketError> {
        let max_depth = budget.limits().max_nesting_depth;
        if depth >= max_depth {
            return Err(PacketError::NestingTooDeep { limit: max_depth });
        }

        let (&code, payload) = body
            .split_first()
            .ok_or(WireError::UnexpectedEof { offset: 0 })?;
        let algorithm = CompressionAlgorithm::from_wire_byte(code)?;

        let mut packet = Self {
            algorithm,
            raw_payload: OnceLock::from(payload.to_vec()),
            packets: PacketList::new(),
        };
        packet.decompress_nested(budget, depth)?;

        debug!(
            %algorithm,
            depth,
            payload = payload.len(),
            packets = packet.packets.len(),
            "read compressed packet"
        );
        Ok(packet)
    }

    /// Decode the cached raw payload into the inner packet list using
    /// the default [`DecodeLimits`].
    ///
    /// # Errors
    ///
    /// See [`decompress_with_limits`](Self::decompress_with_limits).
    pub fn decompress(&mut self) -> Result<(), PacketError> {
        self.decompress_with_limits(&DecodeLimits::default())
    }

    /// Decode the cached raw payload into the inner packet list.
    ///
    /// # Errors
    ///
    /// - [`PacketError::PreconditionViolation`] if there is no raw payload.
    /// - Whatever the algorithm's back end returns
    ///   ([`PacketError::NotImplemented`] for bzip2, inflate and zlib
    ///   framing errors, [`PacketError::DecompressionBomb`]).
    /// - Nested packet parse errors, unchanged.
    pub fn decompress_with_limits(&mut self, limits: &DecodeLimits) -> Result<(), PacketError> {
        self.decompress_nested(&mut DecodeBudget::new(limits), 0)
    }

    fn decompress_nested(
        &mut self,
        budget: &mut DecodeBudget,
        depth: usize,
    ) -> Result<(), PacketError> {
        let payload = self
            .raw_payload
            .get()
            .ok_or(PacketError::PreconditionViolation {
                reason: "decompress called before a raw payload was read or produced",
            })?;
        let inner = budget.decode(self.algorithm, payload)?;
        self.packets = PacketList::read_nested(&inner, budget, depth + 1)?;
        Ok(())
    }

    /// Serialize the inner packets and compress them with the packet's
    /// algorithm, replacing any cached raw payload.
    ///
    /// # Errors
    ///
    /// - [`PacketError::NotImplemented`] for zip, zlib and bzip2.
    /// - Serialization errors from the inner packets.
    pub fn compress(&mut self) -> Result<(), PacketError> {
        let payload = self.encode_payload()?;
        self.raw_payload = OnceLock::from(payload);
        Ok(())
    }

    fn encode_payload(&self) -> Result<Vec<u8>, PacketError> {
        let plain = self.packets.write()?;
        let payload = codec_for(self.algorithm).encode(&plain)?;
        debug!(
            algorithm = %self.algorithm,
            plain = plain.len(),
            payload = payload.len(),
            "compressed packet payload"
        );
        Ok(payload)
    }

    /// Serialize the packet body: algorithm octet followed by the raw
    /// payload, compressing first if no payload is cached.
    ///
    /// # Errors
    ///
    /// Fails exactly as [`compress`](Self::compress) fails when there is
    /// no cached payload.
    pub fn write(&self) -> Result<Vec<u8>, PacketError> {
        let payload = match self.raw_payload.get() {
            Some(payload) => payload,
            None => {
                let payload = self.encode_payload()?;
                self.raw_payload.get_or_init(|| payload)
            }
        };

        let mut out = Vec::with_capacity(1 + payload.len());
        out.push(self.algorithm.to_wire_byte());
        out.extend_from_slice(payload);
        Ok(out)
    }

    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.algorithm
    }

    /// Change the algorithm. Drops any cached raw payload.
    pub fn set_algorithm(&mut self, algorithm: CompressionAlgorithm) {
        self.algorithm = algorithm;
        self.raw_payload.take();
    }

    pub fn packets(&self) -> &PacketList {
        &self.packets
    }

    /// Mutable access to the inner packets. Drops any cached raw payload.
    pub fn packets_mut(&mut self) -> &mut PacketList {
        self.raw_payload.take();
        &mut self.packets
    }

    /// The still-compressed payload as last read or produced, if any.
    pub fn raw_payload(&self) -> Option<&[u8]> {
        self.raw_payload.get().map(Vec::as_slice)
    }

    pub fn into_packets(self) -> PacketList {
        self.packets
    }
}

impl PartialEq for CompressedDataPacket {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.packets == other.packets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::LiteralFormat;
    use crate::literal::LiteralDataPacket;
    use crate::packet::Packet;

    fn literal(data: &[u8]) -> Packet {
        Packet::Literal(LiteralDataPacket {
            format: LiteralFormat::Binary,
            filename: b"msg.txt".to_vec(),
            date: 0,
            data: data.to_vec(),
        })
    }

    /// Inner stream: one literal packet "hi.txt" / "hello, compressed world\n".
    const INNER_STREAM: &str =
        "cb24620668692e7478740000000068656c6c6f2c20636f6d7072657373656420776f726c640a";

    // ── read ──────────────────────────────────────────────────────────

    #[test]
    fn read_uncompressed_exposes_inner_packets() {
        let inner = hex::decode(INNER_STREAM).unwrap();
        let mut body = vec![0x00];
        body.extend_from_slice(&inner);

        let packet = CompressedDataPacket::read(&body).unwrap();
        assert_eq!(packet.algorithm(), CompressionAlgorithm::Uncompressed);
        assert_eq!(packet.packets(), &PacketList::read(&inner).unwrap());
        assert_eq!(packet.raw_payload(), Some(inner.as_slice()));
    }

    #[test]
    fn read_then_write_is_byte_exact() {
        let mut body = vec![0x01];
        body.extend(
            hex::decode("3bad92c49691a9575251c2000419a93939f93a0ac9f9b90545a9c5c5a9290ae5f94539295c00")
                .unwrap(),
        );
        let packet = CompressedDataPacket::read(&body).unwrap();
        assert_eq!(packet.algorithm(), CompressionAlgorithm::Zip);
        // zip cannot encode, so this only works because the payload is cached
        assert_eq!(packet.write().unwrap(), body);
    }

    #[test]
    fn read_empty_body_fails() {
        assert!(matches!(
            CompressedDataPacket::read(&[]),
            Err(PacketError::Wire(WireError::UnexpectedEof { offset: 0 }))
        ));
    }

    #[test]
    fn read_unknown_algorithm_fails() {
        assert!(matches!(
            CompressedDataPacket::read(&[0xFF, 0x00]),
            Err(PacketError::UnknownAlgorithm { value: 0xFF })
        ));
    }

    #[test]
    fn read_bzip2_fails_not_implemented() {
        assert!(matches!(
            CompressedDataPacket::read(b"\x03BZh91AY&SY"),
            Err(PacketError::NotImplemented {
                algorithm: CompressionAlgorithm::Bzip2,
                ..
            })
        ));
    }

    #[test]
    fn read_propagates_inner_parse_error() {
        // Inner stream is a header octet with bit 7 clear.
        assert!(matches!(
            CompressedDataPacket::read(&[0x00, 0x4C]),
            Err(PacketError::Wire(WireError::InvalidPacketHeader { value: 0x4C, .. }))
        ));
    }

    #[test]
    fn read_honours_nesting_limit() {
        let inner = CompressedDataPacket::new(
            CompressionAlgorithm::Uncompressed,
            PacketList::from(vec![literal(b"deep")]),
        );
        let outer = CompressedDataPacket::new(
            CompressionAlgorithm::Uncompressed,
            PacketList::from(vec![Packet::Compressed(inner)]),
        );
        let body = outer.write().unwrap();

        let one_level = DecodeLimits {
            max_nesting_depth: 1,
            ..DecodeLimits::default()
        };
        assert!(matches!(
            CompressedDataPacket::read_with_limits(&body, &one_level),
            Err(PacketError::NestingTooDeep { limit: 1 })
        ));

        let two_levels = DecodeLimits {
            max_nesting_depth: 2,
            ..DecodeLimits::default()
        };
        let decoded = CompressedDataPacket::read_with_limits(&body, &two_levels).unwrap();
        assert_eq!(decoded, outer);
    }

    // ── write / compress ──────────────────────────────────────────────

    #[test]
    fn write_uncompressed_is_algorithm_byte_plus_stream() {
        let packets = PacketList::from(vec![literal(b"hello")]);
        let expected_stream = packets.write().unwrap();

        let packet = CompressedDataPacket::new(CompressionAlgorithm::Uncompressed, packets);
        assert!(packet.raw_payload().is_none());

        let body = packet.write().unwrap();
        assert_eq!(body[0], 0x00);
        assert_eq!(&body[1..], expected_stream.as_slice());
        assert_eq!(packet.raw_payload(), Some(expected_stream.as_slice()));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let packets = PacketList::from(vec![literal(b"one"), literal(b"two")]);
        let packet = CompressedDataPacket::new(CompressionAlgorithm::Uncompressed, packets.clone());
        let decoded = CompressedDataPacket::read(&packet.write().unwrap()).unwrap();
        assert_eq!(decoded.packets(), &packets);
    }

    #[test]
    fn write_without_encoder_fails() {
        for algorithm in [
            CompressionAlgorithm::Zip,
            CompressionAlgorithm::Zlib,
            CompressionAlgorithm::Bzip2,
        ] {
            let packet = CompressedDataPacket::new(algorithm, PacketList::from(vec![literal(b"x")]));
            assert!(
                matches!(
                    packet.write(),
                    Err(PacketError::NotImplemented { algorithm: a, .. }) if a == algorithm
                ),
                "{algorithm} write should fail"
            );
            assert!(packet.raw_payload().is_none());
        }
    }

    #[test]
    fn explicit_compress_populates_cache() {
        let mut packet =
            CompressedDataPacket::new(CompressionAlgorithm::Uncompressed, PacketList::new());
        packet.compress().unwrap();
        assert_eq!(packet.raw_payload(), Some(&[][..]));
        assert_eq!(packet.write().unwrap(), vec![0x00]);
    }

    // ── decompress ────────────────────────────────────────────────────

    #[test]
    fn decompress_without_payload_is_precondition_violation() {
        let mut packet = CompressedDataPacket::default();
        assert!(matches!(
            packet.decompress(),
            Err(PacketError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn decompress_after_compress_restores_packets() {
        let packets = PacketList::from(vec![literal(b"again")]);
        let mut packet = CompressedDataPacket::new(CompressionAlgorithm::Uncompressed, packets.clone());
        packet.compress().unwrap();
        packet.packets_mut().push(literal(b"extra"));
        // packets_mut dropped the cache
        assert!(matches!(
            packet.decompress(),
            Err(PacketError::PreconditionViolation { .. })
        ));
        packet.compress().unwrap();
        packet.decompress().unwrap();
        assert_eq!(packet.packets().len(), 2);
    }

    // ── cache invalidation ────────────────────────────────────────────

    #[test]
    fn mutation_after_write_invalidates_cache() {
        let packet = CompressedDataPacket::new(
            CompressionAlgorithm::Uncompressed,
            PacketList::from(vec![literal(b"before")]),
        );
        let first = packet.write().unwrap();

        let mut packet = packet;
        packet.packets_mut().push(literal(b"after"));
        let second = packet.write().unwrap();

        assert_ne!(first, second);
        let decoded = CompressedDataPacket::read(&second).unwrap();
        assert_eq!(decoded.packets().len(), 2);
    }

    #[test]
    fn set_algorithm_invalidates_cache() {
        let mut body = vec![0x01];
        body.extend(hex::decode("cb48cdc9c90700").unwrap());
        // "hello" is not a packet stream, so build the zip packet by hand
        let mut packet = CompressedDataPacket::new(CompressionAlgorithm::Zip, PacketList::new());
        packet.raw_payload = OnceLock::from(body[1..].to_vec());
        assert_eq!(packet.write().unwrap(), body);

        packet.set_algorithm(CompressionAlgorithm::Uncompressed);
        assert!(packet.raw_payload().is_none());
        assert_eq!(packet.write().unwrap(), vec![0x00]);
    }

    #[test]
    fn equality_ignores_cache() {
        let packets = PacketList::from(vec![literal(b"eq")]);
        let fresh = CompressedDataPacket::new(CompressionAlgorithm::Uncompressed, packets.clone());
        let decoded = CompressedDataPacket::read(&fresh.write().unwrap()).unwrap();
        let other = CompressedDataPacket::new(CompressionAlgorithm::Uncompressed, packets);
        assert!(other.raw_payload().is_none());
        assert_eq!(decoded, other);
    }

    // ── sharing ───────────────────────────────────────────────────────

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn decoded_packets_are_send_and_sync() {
        assert_send_sync::<CompressedDataPacket>();
        assert_send_sync::<Packet>();
        assert_send_sync::<PacketList>();
    }

    #[test]
    fn lazy_write_from_several_threads() {
        let packet = std::sync::Arc::new(CompressedDataPacket::new(
            CompressionAlgorithm::Uncompressed,
            PacketList::from(vec![literal(b"shared")]),
        ));
        let bodies: Vec<Vec<u8>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let packet = std::sync::Arc::clone(&packet);
                    scope.spawn(move || packet.write().unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(packet.raw_payload(), Some(&bodies[0][1..]));
    }
}
