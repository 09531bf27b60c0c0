use crate::error::WireError;

/// Maximum number of bytes a new-format body length can occupy
/// (0xFF marker plus a big-endian `u32`).
pub const MAX_LENGTH_BYTES: usize = 5;

/// Largest value that fits in a one-octet length.
const ONE_OCTET_MAX: u32 = 191;

/// Largest value that fits in a two-octet length.
const TWO_OCTET_MAX: u32 = 8383;

/// A decoded new-format body length.
///
/// ```text
/// ┌────────────┬──────────────────────┬──────────────────────────────┐
/// │ 1st octet  │ Form                 │ Value                        │
/// ├────────────┼──────────────────────┼──────────────────────────────┤
/// │ 0..=191    │ one-octet            │ o1                           │
/// │ 192..=223  │ two-octet            │ ((o1 - 192) << 8) + o2 + 192 │
/// │ 224..=254  │ partial body length  │ 1 << (o1 & 0x1F)             │
/// │ 255        │ five-octet           │ u32 big-endian in o2..o5     │
/// └────────────┴──────────────────────┴──────────────────────────────┘
/// ```
///
/// A `Partial` length says "this many bytes follow, and another length
/// comes after them". The chain ends with a `Definite` length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyLength {
    Definite(u32),
    Partial(u32),
}

/// Encode a definite body length using the shortest new-format form.
///
/// # Returns
///
/// The number of bytes written (1, 2 or 5).
///
/// # Wire format examples
///
/// | Length  | Encoded bytes                  |
/// |---------|--------------------------------|
/// | 0       | `[0x00]`                       |
/// | 191     | `[0xBF]`                       |
/// | 192     | `[0xC0, 0x00]`                 |
/// | 1723    | `[0xC5, 0xFB]`                 |
/// | 8383    | `[0xDF, 0xFF]`                 |
/// | 100000  | `[0xFF, 0x00, 0x01, 0x86, 0xA0]` |
pub fn encode_body_length(len: u32, buf: &mut [u8; MAX_LENGTH_BYTES]) -> usize {
    if len <= ONE_OCTET_MAX {
        buf[0] = len as u8;
        1
    } else if len <= TWO_OCTET_MAX {
        let v = len - 192;
        buf[0] = ((v >> 8) + 192) as u8;
        buf[1] = (v & 0xFF) as u8;
        2
    } else {
        buf[0] = 0xFF;
        buf[1..5].copy_from_slice(&len.to_be_bytes());
        5
    }
}

/// Decode a new-format body length from the start of `buf`.
///
/// # Returns
///
/// `(length, bytes_consumed)` on success.
///
/// # Errors
///
/// [`WireError::UnexpectedEof`] if `buf` ends inside the length field.
pub fn decode_body_length(buf: &[u8]) -> Result<(BodyLength, usize), WireError> {
    let first = *buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?;

    match first {
        0..=191 => Ok((BodyLength::Definite(u32::from(first)), 1)),
        192..=223 => {
            let second = *buf.get(1).ok_or(WireError::UnexpectedEof { offset: 1 })?;
            let len = ((u32::from(first) - 192) << 8) + u32::from(second) + 192;
            Ok((BodyLength::Definite(len), 2))
        }
        224..=254 => Ok((BodyLength::Partial(1 << (first & 0x1F)), 1)),
        255 => {
            let raw = buf
                .get(1..5)
                .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
            let len = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
            Ok((BodyLength::Definite(len), 5))
        }
    }
}
