/// Errors raised while framing or unframing OpenPGP packets.
///
/// These are byte-level failures: the packet header is malformed, a
/// length field points past the end of the input, or a body is too big
/// to describe with a new-format length. Semantic failures inside a
/// packet body live one layer up, in `pgc-types`.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a complete header, length or body could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The packet tag octet does not have bit 7 set.
    #[error("invalid packet header octet {value:#04X} at offset {offset}")]
    InvalidPacketHeader { offset: usize, value: u8 },

    /// A partial body length was not terminated by a definite length.
    #[error("partial body length chain not terminated at offset {offset}")]
    UnterminatedPartialBody { offset: usize },

    /// The tag does not fit in the 6 bits of a new-format header.
    #[error("packet tag {tag} does not fit in a new-format header")]
    TagOutOfRange { tag: u8 },

    /// The body cannot be described by a five-octet length (max `u32::MAX`).
    #[error("packet body too large: {size} bytes")]
    BodyTooLarge { size: usize },

    /// I/O error during read or write.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
