#![warn(clippy::pedantic)]

pub mod error;
pub mod length;
pub mod packet_frame;

pub use error::WireError;
pub use packet_frame::PacketFrame;
