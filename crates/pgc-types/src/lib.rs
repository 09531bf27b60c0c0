#![warn(clippy::pedantic)]

pub mod error;
pub mod enums;
pub mod packet_tag;
pub mod limits;
pub mod literal;
pub mod compression;
pub mod compressed;
pub mod packet;
pub mod packet_list;
pub mod builder;

pub use builder::CompressedDataBuilder;
pub use compressed::CompressedDataPacket;
pub use compression::{CompressionCodec, Direction, codec_for};
pub use enums::{CompressionAlgorithm, LiteralFormat};
pub use error::PacketError;
pub use limits::DecodeLimits;
pub use literal::LiteralDataPacket;
pub use packet::Packet;
pub use packet_list::PacketList;
pub use packet_tag::PacketTag;
