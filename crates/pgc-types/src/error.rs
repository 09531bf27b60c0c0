use pgc_wire::WireError;

use crate::compression::Direction;
use crate::enums::CompressionAlgorithm;

/// Errors that can occur while decoding or encoding packet bodies.
///
/// These sit above [`WireError`]: framing problems are wrapped, while
/// everything about what a body *means* (algorithm codes, compression
/// streams, nesting) is reported here.
///
/// # Error hierarchy
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │ PacketError (this crate)                                     │
/// │   ├── UnknownAlgorithm              algorithm byte not 0..=3 │
/// │   ├── NotImplemented                no transform that way    │
/// │   ├── UnsupportedCompressionMethod  zlib CM nibble != 8      │
/// │   ├── PreconditionViolation         API used out of order    │
/// │   ├── zlib framing: Truncated / InvalidHeader / PresetDict   │
/// │   ├── ChecksumMismatch              Adler-32 trailer wrong   │
/// │   ├── InflateFailed / DecompressionBomb                      │
/// │   ├── NestingTooDeep                containers inside ...    │
/// │   ├── InvalidEnumValue / FilenameTooLong                     │
/// │   └── wraps WireError for framing failures                   │
/// └──────────────────────────────────────────────────────────────┘
/// ```
///
/// No variant is recovered from inside this crate. Every one aborts the
/// current read or write and surfaces to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The algorithm byte of a compressed-data body is not a known code.
    #[error("unknown compression algorithm {value:#04X}")]
    UnknownAlgorithm { value: u8 },

    /// The algorithm is recognized but has no transform in this direction.
    #[error("{algorithm} {direction} is not implemented")]
    NotImplemented {
        algorithm: CompressionAlgorithm,
        direction: Direction,
    },

    /// A zlib stream names a compression method other than DEFLATE (8).
    #[error("zlib compression method {method} is not supported, only DEFLATE (8)")]
    UnsupportedCompressionMethod { method: u8 },

    /// An operation was called before the state it needs was populated.
    ///
    /// This is a programming error in the caller, not bad input data.
    #[error("precondition violated: {reason}")]
    PreconditionViolation { reason: &'static str },

    /// A zlib stream is shorter than its 2-byte header plus 4-byte trailer.
    #[error("zlib stream truncated: {len} bytes")]
    TruncatedZlibStream { len: usize },

    /// The zlib CMF/FLG pair fails its mod-31 check.
    #[error("invalid zlib header {cmf:#04X} {flg:#04X}")]
    InvalidZlibHeader { cmf: u8, flg: u8 },

    /// The zlib header requests a preset dictionary.
    #[error("zlib preset dictionaries are not supported")]
    PresetDictionaryUnsupported,

    /// The Adler-32 trailer of a zlib stream does not match the output.
    #[error("zlib checksum mismatch: expected {expected:#010X}, got {actual:#010X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// The DEFLATE decoder rejected the stream.
    #[error("inflate failed: {0}")]
    InflateFailed(String),

    /// Decompressed output exceeds the configured limit.
    #[error("decompressed size exceeds limit {limit}")]
    DecompressionBomb { limit: usize },

    /// Compressed containers are nested deeper than the configured limit.
    #[error("compressed packets nested deeper than {limit}")]
    NestingTooDeep { limit: usize },

    /// An enum field contained a byte outside its defined set.
    #[error("invalid {enum_name} value: {value:#04X}")]
    InvalidEnumValue { enum_name: &'static str, value: u8 },

    /// A literal packet filename does not fit its one-byte length prefix.
    #[error("literal filename is {len} bytes, limit 255")]
    FilenameTooLong { len: usize },

    /// A framing error from `pgc-wire`.
    #[error(transparent)]
    Wire(#[from] WireError),
}
