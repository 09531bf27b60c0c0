use pgc_wire::PacketFrame;
use tracing::trace;

use crate::error::PacketError;
use crate::limits::{DecodeBudget, DecodeLimits};
use crate::literal::LiteralDataPacket;
use crate::packet::Packet;

/// An ordered sequence of packets, as found in a message or inside a
/// compressed-data packet.
///
/// Reading walks the byte stream frame by frame until it is exhausted;
/// an empty stream is an empty list. Writing emits each packet with a
/// new-format header, so a list read from old-format or partial-length
/// input is equal (but not byte-identical) after a write/read cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PacketList {
    packets: Vec<Packet>,
}

impl PacketList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a packet stream with the default [`DecodeLimits`].
    ///
    /// # Errors
    ///
    /// See [`read_with_limits`](Self::read_with_limits).
    pub fn read(bytes: &[u8]) -> Result<Self, PacketError> {
        Self::read_with_limits(bytes, &DecodeLimits::default())
    }

    /// Parse a packet stream, descending into compressed packets.
    ///
    /// # Errors
    ///
    /// - [`PacketError::Wire`] for malformed or truncated frames.
    /// - Any error from decoding a packet body, including nested
    ///   compressed-data failures.
    pub fn read_with_limits(bytes: &[u8], limits: &DecodeLimits) -> Result<Self, PacketError> {
        Self::read_nested(bytes, &mut DecodeBudget::new(limits), 0)
    }

    pub(crate) fn read_nested(
        bytes: &[u8],
        budget: &mut DecodeBudget,
        depth: usize,
    ) -> Result<Self, PacketError> {
        let mut cursor = 0;
        let mut packets = Vec::new();

        while cursor < bytes.len() {
            let (frame, consumed) = PacketFrame::read_from(&bytes[cursor..])?;
            trace!(tag = frame.tag, len = frame.body.len(), offset = cursor, depth, "packet frame");
            packets.push(Packet::from_frame(frame, budget, depth)?);
            cursor += consumed;
        }

        Ok(Self { packets })
    }

    /// Serialize every packet with a new-format header.
    ///
    /// # Errors
    ///
    /// Propagates packet encoding errors, including
    /// [`PacketError::NotImplemented`] from compressed packets with no
    /// cached payload and no encoder.
    pub fn write(&self) -> Result<Vec<u8>, PacketError> {
        let mut buf = Vec::new();
        for packet in &self.packets {
            packet.to_frame()?.write_to(&mut buf)?;
        }
        Ok(buf)
    }

    pub fn push(&mut self, packet: Packet) {
        self.packets.push(packet);
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Packet> {
        self.packets.iter()
    }

    pub fn as_slice(&self) -> &[Packet] {
        &self.packets
    }

    /// Find the first literal packet, searching compressed packets
    /// depth-first in stream order.
    pub fn literal_data(&self) -> Option<&LiteralDataPacket> {
        self.packets.iter().find_map(|packet| match packet {
            Packet::Literal(literal) => Some(literal),
            Packet::Compressed(compressed) => compressed.packets().literal_data(),
            Packet::Opaque { .. } => None,
        })
    }
}

impl From<Vec<Packet>> for PacketList {
    fn from(packets: Vec<Packet>) -> Self {
        Self { packets }
    }
}

impl FromIterator<Packet> for PacketList {
    fn from_iter<I: IntoIterator<Item = Packet>>(iter: I) -> Self {
        Self {
            packets: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PacketList {
    type Item = Packet;
    type IntoIter = std::vec::IntoIter<Packet>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.into_iter()
    }
}

impl<'a> IntoIterator for &'a PacketList {
    type Item = &'a Packet;
    type IntoIter = std::slice::Iter<'a, Packet>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}
