use std::{io::Cursor, ops::Range};

use ciborium::value::Value;

use crate::{
    ctap2::{
        AuthenticatorData, AuthenticatorDataError, DecodeError, EncodeError,
        UNCOMPRESSED_POINT_LEN,
    },
    Bytes,
};

/// Byte range of authenticator data that is read as the public key by
/// [`extract_public_key_bytes`].
pub const PUBLIC_KEY_BYTES: Range<usize> = 33..65;

const FMT: &str = "fmt";
const ATT_STMT: &str = "attStmt";
const AUTH_DATA: &str = "authData";

/// The attestation object returned by `create()`, a CBOR map of three members.
///
/// <https://w3c.github.io/webauthn/#sctn-attestation>
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationObject {
    /// The attestation statement format identifier, `"none"` for self-contained demos.
    pub fmt: String,

    /// The attestation statement, whose format is identified by [`Self::fmt`]. The client treats
    /// it as an opaque CBOR map.
    pub att_stmt: Value,

    /// The encoded [`AuthenticatorData`].
    pub auth_data: Bytes,
}

impl AttestationObject {
    /// Format identifier of an attestation statement that conveys nothing.
    pub const FMT_NONE: &'static str = "none";

    /// Wrap authenticator data in an attestation object with the `none` format and an empty
    /// statement.
    pub fn none(auth_data: &AuthenticatorData) -> Result<Self, EncodeError> {
        Ok(Self {
            fmt: Self::FMT_NONE.into(),
            att_stmt: Value::Map(Vec::new()),
            auth_data: auth_data.to_vec()?.into(),
        })
    }

    /// Decode an attestation object from its CBOR encoding.
    ///
    /// This only checks the shape of the map. The authenticator data stays opaque until
    /// [`Self::authenticator_data`] is called.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Cursor::new(bytes);
        let value: Value = ciborium::de::from_reader(&mut reader)
            .map_err(|e| DecodeError::Cbor(e.to_string()))?;
        let consumed = usize::try_from(reader.position()).unwrap_or(usize::MAX);
        if consumed < bytes.len() {
            return Err(DecodeError::Cbor(format!(
                "{} bytes after the attestation object",
                bytes.len() - consumed
            )));
        }
        let Value::Map(entries) = value else {
            return Err(DecodeError::Cbor("attestation object is not a map".into()));
        };

        let (mut fmt, mut att_stmt, mut auth_data) = (None, None, None);
        for (key, value) in entries {
            match key.as_text() {
                Some(FMT) => fmt = Some(value),
                Some(ATT_STMT) => att_stmt = Some(value),
                Some(AUTH_DATA) => auth_data = Some(value),
                _ => log::debug!("ignoring unknown attestation object member {key:?}"),
            }
        }

        let fmt = match fmt.ok_or_else(|| missing(FMT))? {
            Value::Text(fmt) => fmt,
            _ => return Err(unexpected(FMT, "text string")),
        };
        let att_stmt = att_stmt.ok_or_else(|| missing(ATT_STMT))?;
        if !att_stmt.is_map() {
            return Err(unexpected(ATT_STMT, "map"));
        }
        let auth_data = match auth_data.ok_or_else(|| missing(AUTH_DATA))? {
            Value::Bytes(auth_data) => Bytes::from(auth_data),
            _ => return Err(unexpected(AUTH_DATA, "byte string")),
        };

        log::debug!(
            "decoded {fmt} attestation object with {} bytes of authenticator data",
            auth_data.len()
        );

        Ok(Self {
            fmt,
            att_stmt,
            auth_data,
        })
    }

    /// Encode to CBOR, with the members in canonical order.
    pub fn to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let value = Value::Map(vec![
            (Value::Text(FMT.into()), Value::Text(self.fmt.clone())),
            (Value::Text(ATT_STMT.into()), self.att_stmt.clone()),
            (
                Value::Text(AUTH_DATA.into()),
                Value::Bytes(self.auth_data.to_vec()),
            ),
        ]);
        let mut bytes = Vec::with_capacity(self.auth_data.len() + 32);
        ciborium::ser::into_writer(&value, &mut bytes).map_err(|e| EncodeError(e.to_string()))?;
        Ok(bytes)
    }

    /// Parse the embedded authenticator data.
    pub fn authenticator_data(&self) -> Result<AuthenticatorData, AuthenticatorDataError> {
        AuthenticatorData::from_slice(&self.auth_data)
    }

    /// The credential public key as an uncompressed SEC1 point, read through the validated
    /// authenticator data parser.
    pub fn credential_public_key_point(
        &self,
    ) -> Result<[u8; UNCOMPRESSED_POINT_LEN], AuthenticatorDataError> {
        self.authenticator_data()?.credential_public_key_point()
    }
}

fn missing(field: &'static str) -> DecodeError {
    DecodeError::Cbor(format!("attestation object has no {field} member"))
}

fn unexpected(field: &'static str, expected: &'static str) -> DecodeError {
    DecodeError::UnexpectedType { field, expected }
}

/// Copy [`PUBLIC_KEY_BYTES`] out of the authenticator data without interpreting it.
///
/// The range only lines up with key material for a fixed layout that real authenticators do not
/// produce, so prefer [`AttestationObject::credential_public_key_point`]. Authenticator data
/// shorter than the end of the range is refused.
pub fn extract_public_key_bytes(
    object: &AttestationObject,
) -> Result<[u8; 32], AuthenticatorDataError> {
    object
        .auth_data
        .get(PUBLIC_KEY_BYTES)
        .and_then(|slice| <[u8; 32]>::try_from(slice).ok())
        .ok_or(AuthenticatorDataError::TooShort {
            expected: PUBLIC_KEY_BYTES.end,
            actual: object.auth_data.len(),
        })
}
