use pgc_wire::packet_frame::tag;

/// Semantic packet tag identifiers.
///
/// Each variant maps to the tag number carried in the packet header and
/// mirrored by the `pgc_wire::packet_frame::tag` constants. Unassigned
/// values are kept as `Unknown(u8)` so a stream containing them can be
/// re-framed without loss.
///
/// ```text
/// ┌─────┬─────────────────────────────────────┐
/// │ Tag │ Variant                             │
/// ├─────┼─────────────────────────────────────┤
/// │ 1   │ PublicKeyEncryptedSessionKey        │
/// │ 2   │ Signature                           │
/// │ 3   │ SymmetricKeyEncryptedSessionKey     │
/// │ 4   │ OnePassSignature                    │
/// │ 5   │ SecretKey                           │
/// │ 6   │ PublicKey                           │
/// │ 7   │ SecretSubkey                        │
/// │ 8   │ CompressedData                      │
/// │ 9   │ SymmetricallyEncryptedData          │
/// │ 10  │ Marker                              │
/// │ 11  │ LiteralData                         │
/// │ 12  │ Trust                               │
/// │ 13  │ UserId                              │
/// │ 14  │ PublicSubkey                        │
/// │ 17  │ UserAttribute                       │
/// │ 18  │ SymEncryptedIntegrityProtectedData  │
/// │ 19  │ ModificationDetectionCode           │
/// └─────┴─────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacketTag {
    PublicKeyEncryptedSessionKey,
    Signature,
    SymmetricKeyEncryptedSessionKey,
    OnePassSignature,
    SecretKey,
    PublicKey,
    SecretSubkey,
    CompressedData,
    SymmetricallyEncryptedData,
    Marker,
    LiteralData,
    Trust,
    UserId,
    PublicSubkey,
    UserAttribute,
    SymEncryptedIntegrityProtectedData,
    ModificationDetectionCode,
    /// Any tag number this version has no name for.
    Unknown(u8),
}

impl PacketTag {
    /// Return the tag number for this variant.
    pub fn wire_id(self) -> u8 {
        match self {
            Self::PublicKeyEncryptedSessionKey => tag::PUBLIC_KEY_ENCRYPTED_SESSION_KEY,
            Self::Signature => tag::SIGNATURE,
            Self::SymmetricKeyEncryptedSessionKey => tag::SYMMETRIC_KEY_ENCRYPTED_SESSION_KEY,
            Self::OnePassSignature => tag::ONE_PASS_SIGNATURE,
            Self::SecretKey => tag::SECRET_KEY,
            Self::PublicKey => tag::PUBLIC_KEY,
            Self::SecretSubkey => tag::SECRET_SUBKEY,
            Self::CompressedData => tag::COMPRESSED_DATA,
            Self::SymmetricallyEncryptedData => tag::SYMMETRICALLY_ENCRYPTED_DATA,
            Self::Marker => tag::MARKER,
            Self::LiteralData => tag::LITERAL_DATA,
            Self::Trust => tag::TRUST,
            Self::UserId => tag::USER_ID,
            Self::PublicSubkey => tag::PUBLIC_SUBKEY,
            Self::UserAttribute => tag::USER_ATTRIBUTE,
            Self::SymEncryptedIntegrityProtectedData => tag::SYM_ENCRYPTED_INTEGRITY_PROTECTED_DATA,
            Self::ModificationDetectionCode => tag::MODIFICATION_DETECTION_CODE,
            Self::Unknown(id) => id,
        }
    }

    /// Parse a tag number into a [`PacketTag`].
    pub fn from_wire_id(id: u8) -> Self {
        match id {
            tag::PUBLIC_KEY_ENCRYPTED_SESSION_KEY => Self::PublicKeyEncryptedSessionKey,
            tag::SIGNATURE => Self::Signature,
            tag::SYMMETRIC_KEY_ENCRYPTED_SESSION_KEY => Self::SymmetricKeyEncryptedSessionKey,
            tag::ONE_PASS_SIGNATURE => Self::OnePassSignature,
            tag::SECRET_KEY => Self::SecretKey,
            tag::PUBLIC_KEY => Self::PublicKey,
            tag::SECRET_SUBKEY => Self::SecretSubkey,
            tag::COMPRESSED_DATA => Self::CompressedData,
            tag::SYMMETRICALLY_ENCRYPTED_DATA => Self::SymmetricallyEncryptedData,
            tag::MARKER => Self::Marker,
            tag::LITERAL_DATA => Self::LiteralData,
            tag::TRUST => Self::Trust,
            tag::USER_ID => Self::UserId,
            tag::PUBLIC_SUBKEY => Self::PublicSubkey,
            tag::USER_ATTRIBUTE => Self::UserAttribute,
            tag::SYM_ENCRYPTED_INTEGRITY_PROTECTED_DATA => Self::SymEncryptedIntegrityProtectedData,
            tag::MODIFICATION_DETECTION_CODE => Self::ModificationDetectionCode,
            other => Self::Unknown(other),
        }
    }

    /// Short human-readable label, used by the CLI outline.
    pub fn label(self) -> &'static str {
        match self {
            Self::PublicKeyEncryptedSessionKey => "PKESK",
            Self::Signature => "SIGNATURE",
            Self::SymmetricKeyEncryptedSessionKey => "SKESK",
            Self::OnePassSignature => "ONE-PASS SIGNATURE",
            Self::SecretKey => "SECRET KEY",
            Self::PublicKey => "PUBLIC KEY",
            Self::SecretSubkey => "SECRET SUBKEY",
            Self::CompressedData => "COMPRESSED",
            Self::SymmetricallyEncryptedData => "SED",
            Self::Marker => "MARKER",
            Self::LiteralData => "LITERAL",
            Self::Trust => "TRUST",
            Self::UserId => "USER ID",
            Self::PublicSubkey => "PUBLIC SUBKEY",
            Self::UserAttribute => "USER ATTRIBUTE",
            Self::SymEncryptedIntegrityProtectedData => "SEIPD",
            Self::ModificationDetectionCode => "MDC",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}
