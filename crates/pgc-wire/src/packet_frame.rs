use crate::error::WireError;
use crate::length::{BodyLength, MAX_LENGTH_BYTES, decode_body_length, encode_body_length};

/// Known packet tags.
///
/// These are the raw tag numbers that appear in the packet header.
/// `pgc-types` wraps them in a typed `PacketTag` enum.
pub mod tag {
    pub const PUBLIC_KEY_ENCRYPTED_SESSION_KEY: u8 = 1;
    pub const SIGNATURE: u8 = 2;
    pub const SYMMETRIC_KEY_ENCRYPTED_SESSION_KEY: u8 = 3;
    pub const ONE_PASS_SIGNATURE: u8 = 4;
    pub const SECRET_KEY: u8 = 5;
    pub const PUBLIC_KEY: u8 = 6;
    pub const SECRET_SUBKEY: u8 = 7;
    pub const COMPRESSED_DATA: u8 = 8;
    pub const SYMMETRICALLY_ENCRYPTED_DATA: u8 = 9;
    pub const MARKER: u8 = 10;
    pub const LITERAL_DATA: u8 = 11;
    pub const TRUST: u8 = 12;
    pub const USER_ID: u8 = 13;
    pub const PUBLIC_SUBKEY: u8 = 14;
    pub const USER_ATTRIBUTE: u8 = 17;
    pub const SYM_ENCRYPTED_INTEGRITY_PROTECTED_DATA: u8 = 18;
    pub const MODIFICATION_DETECTION_CODE: u8 = 19;

    /// Largest tag a new-format header can carry (6 bits).
    pub const MAX: u8 = 0x3F;
}

/// Bit 7 of the header octet is always set.
const HEADER_ALWAYS_ONE: u8 = 0b1000_0000;

/// Bit 6 selects the new packet format.
const HEADER_NEW_FORMAT: u8 = 0b0100_0000;

/// Packet frame: the wire envelope around every packet body.
///
/// New format (always written):
///
/// ```text
/// ┌───────────────────────────────────────────────────┐
/// │ header  (1 byte: 0b11TT_TTTT, T = tag)            │
/// │ length  (1, 2 or 5 bytes, or partial chunks)      │
/// │ body    [length bytes]                            │
/// └───────────────────────────────────────────────────┘
/// ```
///
/// Old format (accepted on read):
///
/// ```text
/// ┌───────────────────────────────────────────────────┐
/// │ header  (1 byte: 0b10TT_TTLL, LL = length type)   │
/// │ length  (1, 2, 4 bytes, or none = indeterminate)  │
/// │ body    [length bytes]                            │
/// └───────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketFrame {
    /// The raw packet tag (8 = compressed data, 11 = literal data, ...).
    pub tag: u8,

    /// The body bytes, with any partial-length chunks already joined.
    pub body: Vec<u8>,
}

impl PacketFrame {
    /// Write this frame with a new-format header.
    ///
    /// Wire layout written:
    ///   1. header octet `0xC0 | tag`
    ///   2. shortest definite body length
    ///   3. body bytes
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`WireError::TagOutOfRange`] if the tag needs more than 6 bits.
    /// - [`WireError::BodyTooLarge`] if the body exceeds `u32::MAX` bytes.
    /// - [`WireError::Io`] if the writer fails.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        if self.tag > tag::MAX {
            return Err(WireError::TagOutOfRange { tag: self.tag });
        }
        let body_len = u32::try_from(self.body.len()).map_err(|_| WireError::BodyTooLarge {
            size: self.body.len(),
        })?;

        w.write_all(&[HEADER_ALWAYS_ONE | HEADER_NEW_FORMAT | self.tag])?;

        let mut len_buf = [0u8; MAX_LENGTH_BYTES];
        let n = encode_body_length(body_len, &mut len_buf);
        w.write_all(&len_buf[..n])?;

        w.write_all(&self.body)?;

        Ok(1 + n + self.body.len())
    }

    /// Read one packet frame from the start of `buf`.
    ///
    /// # Returns
    ///
    /// `(frame, bytes_consumed)`.
    ///
    /// # Errors
    ///
    /// - [`WireError::InvalidPacketHeader`] if bit 7 of the header is clear.
    /// - [`WireError::UnexpectedEof`] if a length or body is truncated.
    /// - [`WireError::UnterminatedPartialBody`] if partial chunks run off
    ///   the end of the input.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), WireError> {
        let header = *buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?;
        if header & HEADER_ALWAYS_ONE == 0 {
            return Err(WireError::InvalidPacketHeader {
                offset: 0,
                value: header,
            });
        }

        if header & HEADER_NEW_FORMAT != 0 {
            Self::read_new_format(buf, header & tag::MAX)
        } else {
            Self::read_old_format(buf, (header >> 2) & 0x0F, header & 0x03)
        }
    }

    fn read_new_format(buf: &[u8], tag: u8) -> Result<(Self, usize), WireError> {
        let mut cursor = 1;
        let mut body = Vec::new();

        loop {
            let (length, n) = decode_body_length(&buf[cursor..])
                .map_err(|e| rebase_eof(e, cursor))?;
            cursor += n;

            match length {
                BodyLength::Definite(len) => {
                    body.extend_from_slice(take(buf, cursor, len as usize)?);
                    cursor += len as usize;
                    break;
                }
                BodyLength::Partial(len) => {
                    body.extend_from_slice(take(buf, cursor, len as usize)?);
                    cursor += len as usize;
                    if cursor >= buf.len() {
                        return Err(WireError::UnterminatedPartialBody { offset: cursor });
                    }
                }
            }
        }

        Ok((Self { tag, body }, cursor))
    }

    fn read_old_format(buf: &[u8], tag: u8, length_type: u8) -> Result<(Self, usize), WireError> {
        let mut cursor = 1;

        let len = match length_type {
            0 => {
                let b = *buf.get(cursor).ok_or(WireError::UnexpectedEof { offset: cursor })?;
                cursor += 1;
                usize::from(b)
            }
            1 => {
                let raw = take(buf, cursor, 2)?;
                cursor += 2;
                usize::from(u16::from_be_bytes([raw[0], raw[1]]))
            }
            2 => {
                let raw = take(buf, cursor, 4)?;
                cursor += 4;
                u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize
            }
            // Indeterminate length: the body runs to the end of the input.
            _ => buf.len() - cursor,
        };

        let body = take(buf, cursor, len)?.to_vec();
        cursor += len;

        Ok((Self { tag, body }, cursor))
    }
}

/// Borrow `len` bytes of `buf` starting at `start`, or report EOF.
fn take(buf: &[u8], start: usize, len: usize) -> Result<&[u8], WireError> {
    let end = start
        .checked_add(len)
        .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
    buf.get(start..end)
        .ok_or(WireError::UnexpectedEof { offset: buf.len() })
}

/// Shift an EOF offset reported against a sub-slice back to `buf` coordinates.
fn rebase_eof(err: WireError, base: usize) -> WireError {
    match err {
        WireError::UnexpectedEof { offset } => WireError::UnexpectedEof {
            offset: base + offset,
        },
        other => other,
    }
}
