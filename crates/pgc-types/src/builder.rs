use crate::compressed::CompressedDataPacket;
use crate::enums::{CompressionAlgorithm, LiteralFormat};
use crate::error::PacketError;
use crate::literal::LiteralDataPacket;
use crate::packet::Packet;
use crate::packet_list::PacketList;

/// Builder for a [`CompressedDataPacket`].
///
/// Methods append inner packets and return `&mut Self` for chaining.
/// [`build`](Self::build) yields a packet with no cached payload;
/// compression happens on its first `write`.
///
/// ```rust
/// use pgc_types::{CompressedDataBuilder, CompressionAlgorithm, LiteralFormat};
///
/// let bytes = CompressedDataBuilder::new(CompressionAlgorithm::Uncompressed)
///     .add_literal(LiteralFormat::Text, "notes.txt", 0, b"remember the milk\n")
///     .encode()
///     .unwrap();
/// assert_eq!(bytes[0], 0xC8);
/// ```
pub struct CompressedDataBuilder {
    algorithm: CompressionAlgorithm,
    packets: Vec<Packet>,
}

impl CompressedDataBuilder {
    #[must_use]
    pub fn new(algorithm: CompressionAlgorithm) -> Self {
        Self {
            algorithm,
            packets: Vec::new(),
        }
    }

    /// Add a LITERAL DATA packet.
    ///
    /// Filenames longer than 255 bytes are accepted here and rejected
    /// when the packet is written.
    pub fn add_literal(
        &mut self,
        format: LiteralFormat,
        filename: &str,
        date: u32,
        data: &[u8],
    ) -> &mut Self {
        self.add_packet(Packet::Literal(LiteralDataPacket {
            format,
            filename: filename.as_bytes().to_vec(),
            date,
            data: data.to_vec(),
        }))
    }

    /// Add any packet, including another compressed container.
    pub fn add_packet(&mut self, packet: Packet) -> &mut Self {
        self.packets.push(packet);
        self
    }

    /// Produce the packet. The builder can be reused afterwards.
    #[must_use]
    pub fn build(&self) -> CompressedDataPacket {
        CompressedDataPacket::new(self.algorithm, PacketList::from(self.packets.clone()))
    }

    /// Build and serialize as a complete packet stream (header included).
    ///
    /// # Errors
    ///
    /// [`PacketError::NotImplemented`] for algorithms without an encoder,
    /// or any inner packet encoding error.
    pub fn encode(&self) -> Result<Vec<u8>, PacketError> {
        PacketList::from(vec![Packet::Compressed(self.build())]).write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet_tag::PacketTag;

    #[test]
    fn build_is_ready_without_payload() {
        let packet = CompressedDataBuilder::new(CompressionAlgorithm::Zlib)
            .add_literal(LiteralFormat::Binary, "a", 0, b"x")
            .build();
        assert_eq!(packet.algorithm(), CompressionAlgorithm::Zlib);
        assert_eq!(packet.packets().len(), 1);
        assert!(packet.raw_payload().is_none());
    }

    #[test]
    fn chained_packets_keep_order() {
        let packet = CompressedDataBuilder::new(CompressionAlgorithm::Uncompressed)
            .add_packet(Packet::Opaque {
                tag: PacketTag::OnePassSignature,
                body: vec![3, 0, 8, 1],
            })
            .add_literal(LiteralFormat::Utf8, "body.txt", 42, b"text")
            .add_packet(Packet::Opaque {
                tag: PacketTag::Signature,
                body: vec![4],
            })
            .build();

        let tags: Vec<_> = packet.packets().iter().map(Packet::tag).collect();
        assert_eq!(
            tags,
            vec![
                PacketTag::OnePassSignature,
                PacketTag::LiteralData,
                PacketTag::Signature
            ]
        );
    }

    #[test]
    fn encode_reads_back() {
        let bytes = CompressedDataBuilder::new(CompressionAlgorithm::Uncompressed)
            .add_literal(LiteralFormat::Binary, "hello.bin", 0, b"hello")
            .encode()
            .unwrap();
        let list = PacketList::read(&bytes).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.literal_data().unwrap().data, b"hello");
    }

    #[test]
    fn encode_without_encoder_fails() {
        let result = CompressedDataBuilder::new(CompressionAlgorithm::Bzip2)
            .add_literal(LiteralFormat::Binary, "", 0, b"")
            .encode();
        assert!(matches!(result, Err(PacketError::NotImplemented { .. })));
    }

    #[test]
    fn long_filename_fails_on_encode() {
        let name = "n".repeat(300);
        let result = CompressedDataBuilder::new(CompressionAlgorithm::Uncompressed)
            .add_literal(LiteralFormat::Binary, &name, 0, b"")
            .encode();
        assert!(matches!(result, Err(PacketError::FilenameTooLong { len: 300 })));
    }
}
