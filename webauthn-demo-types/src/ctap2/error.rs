/// The attestation object handed back by `create()` could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The bytes are not well-formed CBOR, or do not describe an attestation object map.
    #[error("malformed attestation object: {0}")]
    Cbor(String),

    /// A member of the attestation object has the wrong CBOR type.
    #[error("attestation object member {field} is not a {expected}")]
    UnexpectedType {
        /// The CBOR map key of the member.
        field: &'static str,
        /// The CBOR type the member must have.
        expected: &'static str,
    },
}

/// Encoding a structure to CBOR failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not encode to CBOR: {0}")]
pub struct EncodeError(pub String);

/// The authenticator data does not follow the layout described in
/// <https://w3c.github.io/webauthn/#sctn-authenticator-data>.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticatorDataError {
    /// Fewer bytes than the fixed part of the structure that is being read.
    #[error("authenticator data is {actual} bytes long, at least {expected} are required")]
    TooShort {
        /// Minimum number of bytes needed.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },

    /// The flags byte sets a reserved bit.
    #[error("authenticator data flags {0:#04x} set a reserved bit")]
    InvalidFlags(u8),

    /// The attested credential data ends before the named field is complete.
    #[error("attested credential data is truncated in the {0} field")]
    Truncated(&'static str),

    /// The extensions or credential public key are not well-formed CBOR.
    #[error("malformed CBOR in authenticator data: {0}")]
    Cbor(String),

    /// The credential public key is CBOR but not a valid `COSE_Key`.
    #[error("invalid COSE key: {0}")]
    CoseKey(String),

    /// Bytes remain after the last structure announced by the flags.
    #[error("{0} unexpected bytes after the end of the authenticator data")]
    TrailingBytes(usize),

    /// The `AT` flag is not set, so there is no credential public key to read.
    #[error("authenticator data has no attested credential data")]
    MissingAttestedCredentialData,

    /// The credential public key is not an ES256 key on the P-256 curve.
    #[error("unsupported credential public key: {0}")]
    UnsupportedKey(&'static str),
}
