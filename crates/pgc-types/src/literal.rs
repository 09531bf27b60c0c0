use pgc_wire::WireError;

use crate::enums::LiteralFormat;
use crate::error::PacketError;

/// Maximum filename length, bounded by its one-byte length prefix.
pub const MAX_FILENAME_LEN: usize = 255;

/// LITERAL DATA packet (tag 11): the message payload itself.
///
/// Body layout:
///
/// ```text
/// ┌────────┬──────────┬──────────┬───────────────────────────────┐
/// │ Offset │ Size     │ Field    │ Description                   │
/// ├────────┼──────────┼──────────┼───────────────────────────────┤
/// │ 0      │ 1        │ format   │ 'b', 't', 'u' or 'm'          │
/// │ 1      │ 1        │ name_len │ filename length               │
/// │ 2      │ name_len │ filename │ raw filename bytes            │
/// │ ..     │ 4        │ date     │ big-endian seconds since 1970 │
/// │ ..     │ rest     │ data     │ literal content               │
/// └────────┴──────────┴──────────┴───────────────────────────────┘
/// ```
///
/// The filename is kept as raw bytes; it is not guaranteed to be UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiteralDataPacket {
    pub format: LiteralFormat,
    pub filename: Vec<u8>,
    pub date: u32,
    pub data: Vec<u8>,
}

impl LiteralDataPacket {
    /// Serialize this packet into its body bytes.
    ///
    /// # Errors
    ///
    /// [`PacketError::FilenameTooLong`] if the filename exceeds 255 bytes.
    pub fn encode_body(&self) -> Result<Vec<u8>, PacketError> {
        let name_len = u8::try_from(self.filename.len()).map_err(|_| {
            PacketError::FilenameTooLong {
                len: self.filename.len(),
            }
        })?;

        let mut buf = Vec::with_capacity(6 + self.filename.len() + self.data.len());
        buf.push(self.format.to_wire_byte());
        buf.push(name_len);
        buf.extend_from_slice(&self.filename);
        buf.extend_from_slice(&self.date.to_be_bytes());
        buf.extend_from_slice(&self.data);
        Ok(buf)
    }

    /// Deserialize a literal packet from its body bytes.
    ///
    /// # Errors
    ///
    /// - [`PacketError::InvalidEnumValue`] for an unknown format octet.
    /// - [`PacketError::Wire`] wrapping `UnexpectedEof` if the header
    ///   fields are truncated.
    pub fn decode_body(buf: &[u8]) -> Result<Self, PacketError> {
        let format_byte = *buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?;
        let format = LiteralFormat::from_wire_byte(format_byte)?;

        let name_len = usize::from(*buf.get(1).ok_or(WireError::UnexpectedEof { offset: 1 })?);
        let name_end = 2 + name_len;
        let filename = buf
            .get(2..name_end)
            .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;

        let date_bytes = buf
            .get(name_end..name_end + 4)
            .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
        let date = u32::from_be_bytes([date_bytes[0], date_bytes[1], date_bytes[2], date_bytes[3]]);

        Ok(Self {
            format,
            filename: filename.to_vec(),
            date,
            data: buf[name_end + 4..].to_vec(),
        })
    }

    /// The filename decoded as UTF-8, replacing invalid sequences.
    pub fn filename_lossy(&self) -> String {
        String::from_utf8_lossy(&self.filename).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_layout() {
        let packet = LiteralDataPacket {
            format: LiteralFormat::Binary,
            filename: b"a.txt".to_vec(),
            date: 0x5F5E_1000,
            data: b"hi".to_vec(),
        };
        assert_eq!(
            packet.encode_body().unwrap(),
            b"b\x05a.txt\x5F\x5E\x10\x00hi".to_vec()
        );
    }

    #[test]
    fn decode_encoded_body() {
        let packet = LiteralDataPacket {
            format: LiteralFormat::Utf8,
            filename: "notes.md".into(),
            date: 1_700_000_000,
            data: "hello, world\n".into(),
        };
        let body = packet.encode_body().unwrap();
        assert_eq!(LiteralDataPacket::decode_body(&body).unwrap(), packet);
    }

    #[test]
    fn empty_filename_and_data() {
        let body = [b't', 0, 0, 0, 0, 0];
        let packet = LiteralDataPacket::decode_body(&body).unwrap();
        assert_eq!(packet.format, LiteralFormat::Text);
        assert!(packet.filename.is_empty());
        assert_eq!(packet.date, 0);
        assert!(packet.data.is_empty());
    }

    #[test]
    fn filename_too_long() {
        let packet = LiteralDataPacket {
            filename: vec![b'x'; 256],
            ..LiteralDataPacket::default()
        };
        assert!(matches!(
            packet.encode_body(),
            Err(PacketError::FilenameTooLong { len: 256 })
        ));
    }

    #[test]
    fn truncated_date_is_eof() {
        let body = [b'b', 1, b'f', 0, 0];
        assert!(matches!(
            LiteralDataPacket::decode_body(&body),
            Err(PacketError::Wire(WireError::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn truncated_filename_is_eof() {
        let body = [b'b', 9, b'f'];
        assert!(matches!(
            LiteralDataPacket::decode_body(&body),
            Err(PacketError::Wire(WireError::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn unknown_format_rejected() {
        let body = [b'z', 0, 0, 0, 0, 0];
        assert!(matches!(
            LiteralDataPacket::decode_body(&body),
            Err(PacketError::InvalidEnumValue { value: b'z', .. })
        ));
    }

    #[test]
    fn lossy_filename() {
        let packet = LiteralDataPacket {
            filename: vec![b'a', 0xFF, b'b'],
            ..LiteralDataPacket::default()
        };
        assert_eq!(packet.filename_lossy(), "a\u{FFFD}b");
    }
}
