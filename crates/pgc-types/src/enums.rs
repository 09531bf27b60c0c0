use std::fmt;

use crate::error::PacketError;

// ── Macro for wire-byte enums ─────────────────────────────────────────
//
// Each enum here is a closed set of variants with one wire byte apiece
// and a to_wire_byte / from_wire_byte pair. The call site names the
// error an unknown byte turns into.

macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $wire:literal ),+ $(,)?
    }
    unknown($value:ident) => $err:expr;
  ) => {
    $(#[$meta])*
    pub enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// Encode this variant as its single wire byte.
      pub fn to_wire_byte(self) -> u8 {
        match self {
          $( Self::$variant => $wire ),+
        }
      }

      /// Decode a wire byte into this enum.
      ///
      /// # Errors
      ///
      /// The call site's error for bytes outside the variant set.
      pub fn from_wire_byte(value: u8) -> Result<Self, PacketError> {
        match value {
          $( $wire => Ok(Self::$variant), )+
          $value => Err($err),
        }
      }
    }
  };
}

// ── CompressionAlgorithm ──────────────────────────────────────────────

wire_enum! {
  /// Compression algorithm identifiers for compressed-data packets.
  ///
  /// The set is closed: every byte outside it is a protocol violation and
  /// decodes to [`PacketError::UnknownAlgorithm`] rather than an
  /// `Other(u8)` catch-all.
  ///
  /// ```text
  /// ┌──────┬──────────────┬──────────────────────────────────┐
  /// │ Wire │ Variant      │ Body format                      │
  /// ├──────┼──────────────┼──────────────────────────────────┤
  /// │ 0x00 │ Uncompressed │ packet stream verbatim           │
  /// │ 0x01 │ Zip          │ raw DEFLATE (RFC 1951)           │
  /// │ 0x02 │ Zlib         │ zlib wrapper (RFC 1950)          │
  /// │ 0x03 │ Bzip2        │ bzip2 stream                     │
  /// └──────┴──────────────┴──────────────────────────────────┘
  /// ```
  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
  pub enum CompressionAlgorithm {
    #[default]
    Uncompressed = 0x00,
    Zip = 0x01,
    Zlib = 0x02,
    Bzip2 = 0x03,
  }
  unknown(value) => PacketError::UnknownAlgorithm { value };
}

impl CompressionAlgorithm {
  /// Every known algorithm, in wire order.
  pub const ALL: [Self; 4] = [Self::Uncompressed, Self::Zip, Self::Zlib, Self::Bzip2];

  /// Lowercase name as used in diagnostics and CLI output.
  pub fn name(self) -> &'static str {
    match self {
      Self::Uncompressed => "uncompressed",
      Self::Zip => "zip",
      Self::Zlib => "zlib",
      Self::Bzip2 => "bzip2",
    }
  }
}

impl fmt::Display for CompressionAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ── LiteralFormat ─────────────────────────────────────────────────────

wire_enum! {
  /// Data format octet of a literal-data packet.
  ///
  /// ```text
  /// ┌──────┬────────┬──────────────────────────────┐
  /// │ Wire │ Format │ Meaning                      │
  /// ├──────┼────────┼──────────────────────────────┤
  /// │ 'b'  │ Binary │ opaque bytes                 │
  /// │ 't'  │ Text   │ text, canonical line endings │
  /// │ 'u'  │ Utf8   │ UTF-8 text                   │
  /// │ 'm'  │ Mime   │ MIME message body            │
  /// └──────┴────────┴──────────────────────────────┘
  /// ```
  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
  pub enum LiteralFormat {
    #[default]
    Binary = b'b',
    Text = b't',
    Utf8 = b'u',
    Mime = b'm',
  }
  unknown(value) => PacketError::InvalidEnumValue {
    enum_name: "LiteralFormat",
    value,
  };
}
