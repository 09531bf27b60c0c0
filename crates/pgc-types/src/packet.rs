use pgc_wire::PacketFrame;

use crate::compressed::CompressedDataPacket;
use crate::error::PacketError;
use crate::limits::DecodeBudget;
use crate::literal::LiteralDataPacket;
use crate::packet_tag::PacketTag;

/// One packet of a packet stream.
///
/// Only the two packet kinds that matter for the compressed-data layer
/// are parsed. Everything else (signatures, session keys, key material)
/// is carried as `Opaque` with its tag and body, so a stream can be
/// parsed and written back without understanding every packet in it.
///
/// ```text
/// ┌────────────┬──────────┬─────────────────────────────────┐
/// │ Variant    │ Tag      │ Body                            │
/// ├────────────┼──────────┼─────────────────────────────────┤
/// │ Literal    │ 11       │ LiteralDataPacket               │
/// │ Compressed │ 8        │ CompressedDataPacket (recursive)│
/// │ Opaque     │ any other│ raw bytes, untouched            │
/// └────────────┴──────────┴─────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Literal(LiteralDataPacket),
    Compressed(CompressedDataPacket),
    Opaque { tag: PacketTag, body: Vec<u8> },
}

impl Packet {
    pub fn tag(&self) -> PacketTag {
        match self {
            Self::Literal(_) => PacketTag::LiteralData,
            Self::Compressed(_) => PacketTag::CompressedData,
            Self::Opaque { tag, .. } => *tag,
        }
    }

    /// Encode the packet body (without the packet header).
    ///
    /// # Errors
    ///
    /// Propagates literal encoding errors and, for compressed packets,
    /// [`CompressedDataPacket::write`] errors.
    pub fn encode_body(&self) -> Result<Vec<u8>, PacketError> {
        match self {
            Self::Literal(literal) => literal.encode_body(),
            Self::Compressed(compressed) => compressed.write(),
            Self::Opaque { body, .. } => Ok(body.clone()),
        }
    }

    /// Encode the packet into a frame ready for `PacketFrame::write_to`.
    ///
    /// # Errors
    ///
    /// See [`encode_body`](Self::encode_body).
    pub fn to_frame(&self) -> Result<PacketFrame, PacketError> {
        Ok(PacketFrame {
            tag: self.tag().wire_id(),
            body: self.encode_body()?,
        })
    }

    /// Decode a packet from a frame, dispatching on its tag.
    ///
    /// `depth` is the number of compressed containers enclosing the frame.
    pub(crate) fn from_frame(
        frame: PacketFrame,
        budget: &mut DecodeBudget,
        depth: usize,
    ) -> Result<Self, PacketError> {
        match PacketTag::from_wire_id(frame.tag) {
            PacketTag::LiteralData => Ok(Self::Literal(LiteralDataPacket::decode_body(&frame.body)?)),
            PacketTag::CompressedData => Ok(Self::Compressed(CompressedDataPacket::read_nested(
                &frame.body,
                budget,
                depth,
            )?)),
            tag => Ok(Self::Opaque {
                tag,
                body: frame.body,
            }),
        }
    }
}
