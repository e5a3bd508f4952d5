use std::{
    io::{Cursor, Read},
    num::TryFromIntError,
};

use ciborium::value::{Integer, Value};
use coset::{
    iana::{self, EnumI64},
    AsCborValue, CborSerializable, CoseKey,
};

use crate::{
    crypto::sha256,
    ctap2::{Aaguid, AuthenticatorDataError, EncodeError, Flags},
};

/// Length of the fixed prefix of authenticator data: RP ID hash, flags and signature counter.
pub const AUTHENTICATOR_DATA_MIN_LEN: usize = 32 + 1 + 4;

/// Length of an uncompressed SEC1 encoded P-256 point: `0x04 || x || y`.
pub const UNCOMPRESSED_POINT_LEN: usize = 1 + 2 * COORDINATE_LEN;

const COORDINATE_LEN: usize = 32;
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// The authenticator data structure encodes contextual bindings made by the authenticator: which
/// RP the credential is scoped to, whether the user was present and verified, the signature counter
/// and, on registration, the newly created credential's public key.
///
/// ```text
/// rpIdHash (32) | flags (1) | signCount (4, BE) | attestedCredentialData (var) | extensions (var)
/// ```
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatorData {
    /// SHA-256 hash of the RP ID the credential is scoped to.
    rp_id_hash: [u8; 32],

    /// The flags representing the information of this credential. See [Flags] for more information.
    pub flags: Flags,

    /// Signature counter, 32-bit unsigned big-endian integer.
    pub counter: u32,

    /// Present on registration, in which case [`Flags::AT`] is set.
    pub attested_credential_data: Option<AttestedCredentialData>,

    /// Extension-defined authenticator data, a CBOR map. Present when [`Flags::ED`] is set.
    pub extensions: Option<Value>,
}

impl AuthenticatorData {
    /// Create a new AuthenticatorData object for an RP ID and a signature counter.
    ///
    /// No flags are set. Credentials held in memory are neither backup eligible nor backed up.
    pub fn new(rp_id: &str, counter: u32) -> Self {
        Self {
            rp_id_hash: sha256(rp_id.as_bytes()),
            flags: Flags::empty(),
            counter,
            attested_credential_data: None,
            extensions: None,
        }
    }

    /// Add an [`AttestedCredentialData`] to the authenticator data.
    ///
    /// This sets the [`Flags::AT`] value as well.
    pub fn set_attested_credential_data(mut self, acd: AttestedCredentialData) -> Self {
        self.attested_credential_data = Some(acd);
        self.set_flags(Flags::AT)
    }

    /// Set additional [`Flags`] to the authenticator data.
    pub fn set_flags(mut self, flags: Flags) -> Self {
        self.flags |= flags;
        self
    }

    /// Get read access to the RP ID hash
    pub fn rp_id_hash(&self) -> &[u8; 32] {
        &self.rp_id_hash
    }

    /// The credential public key as an uncompressed SEC1 point, ready to be imported.
    pub fn credential_public_key_point(
        &self,
    ) -> Result<[u8; UNCOMPRESSED_POINT_LEN], AuthenticatorDataError> {
        self.attested_credential_data
            .as_ref()
            .ok_or(AuthenticatorDataError::MissingAttestedCredentialData)?
            .public_key_point()
    }

    /// Decode authenticator data from a byte slice, validating the whole layout.
    ///
    /// Unlike reading fixed offsets, this walks the variable length credential ID and the CBOR
    /// encoded key, and rejects any bytes left over at the end.
    pub fn from_slice(v: &[u8]) -> Result<Self, AuthenticatorDataError> {
        let too_short = || AuthenticatorDataError::TooShort {
            expected: AUTHENTICATOR_DATA_MIN_LEN,
            actual: v.len(),
        };
        let (rp_id_hash, rest) = v.split_first_chunk::<32>().ok_or_else(too_short)?;
        let (&[flag_byte], rest) = rest.split_first_chunk::<1>().ok_or_else(too_short)?;
        let (counter, rest) = rest.split_first_chunk::<4>().ok_or_else(too_short)?;

        let flags =
            Flags::from_bits(flag_byte).ok_or(AuthenticatorDataError::InvalidFlags(flag_byte))?;

        let mut reader = Cursor::new(rest);
        let attested_credential_data = flags
            .contains(Flags::AT)
            .then(|| AttestedCredentialData::from_reader(&mut reader))
            .transpose()?;
        let extensions = flags
            .contains(Flags::ED)
            .then(|| read_extensions(&mut reader))
            .transpose()?;

        let leftover = rest.len().saturating_sub(position(&reader));
        if leftover > 0 {
            return Err(AuthenticatorDataError::TrailingBytes(leftover));
        }

        Ok(AuthenticatorData {
            rp_id_hash: *rp_id_hash,
            flags,
            counter: u32::from_be_bytes(*counter),
            attested_credential_data,
            extensions,
        })
    }

    /// Encode authenticator data to its byte representation.
    pub fn to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let flags = if self.attested_credential_data.is_some() {
            self.flags | Flags::AT
        } else {
            self.flags
        };
        let flags = if self.extensions.is_some() {
            flags | Flags::ED
        } else {
            flags
        };

        let mut bytes = Vec::with_capacity(AUTHENTICATOR_DATA_MIN_LEN + 128);
        bytes.extend_from_slice(&self.rp_id_hash);
        bytes.push(flags.bits());
        bytes.extend_from_slice(&self.counter.to_be_bytes());
        if let Some(acd) = &self.attested_credential_data {
            acd.encode_into(&mut bytes)?;
        }
        if let Some(extensions) = &self.extensions {
            ciborium::ser::into_writer(extensions, &mut bytes)
                .map_err(|e| EncodeError(e.to_string()))?;
        }
        Ok(bytes)
    }
}

fn position(reader: &Cursor<&[u8]>) -> usize {
    usize::try_from(reader.position()).unwrap_or(usize::MAX)
}

fn read_extensions<R: Read>(reader: &mut R) -> Result<Value, AuthenticatorDataError> {
    let value: Value = ciborium::de::from_reader(reader)
        .map_err(|e| AuthenticatorDataError::Cbor(e.to_string()))?;
    if value.is_map() {
        Ok(value)
    } else {
        Err(AuthenticatorDataError::Cbor(
            "extensions are not a CBOR map".into(),
        ))
    }
}

/// Attested credential data is a variable-length byte array added to the authenticator data when
/// generating an attestation object for a credential.
///
/// ```text
/// aaguid (16) | credentialIdLength (2, BE) | credentialId (L) | credentialPublicKey (COSE_Key)
/// ```
///
/// <https://w3c.github.io/webauthn/#attested-credential-data>
#[derive(Debug, Clone, PartialEq)]
pub struct AttestedCredentialData {
    /// The AAGUID of the authenticator.
    pub aaguid: Aaguid,

    /// Not public so that it can never grow past what a u16 length prefix can describe.
    credential_id: Vec<u8>,

    /// The credential public key encoded in `COSE_Key` format.
    pub key: CoseKey,
}

impl AttestedCredentialData {
    /// Create a new [AttestedCredentialData]
    ///
    /// # Error
    /// Returns an error if the length of `credential_id` cannot be represented by a u16.
    pub fn new(
        aaguid: Aaguid,
        credential_id: Vec<u8>,
        key: CoseKey,
    ) -> Result<Self, TryFromIntError> {
        u16::try_from(credential_id.len())?;

        Ok(Self {
            aaguid,
            credential_id,
            key,
        })
    }

    /// Get read access to the credential ID,
    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    /// Convert the `COSE_Key` into an uncompressed SEC1 point.
    ///
    /// Only `EC2` keys for `ES256` on curve `P-256` are accepted, which is the single algorithm
    /// the demo client requests.
    pub fn public_key_point(&self) -> Result<[u8; UNCOMPRESSED_POINT_LEN], AuthenticatorDataError> {
        if !matches!(
            self.key.kty,
            coset::RegisteredLabel::Assigned(iana::KeyType::EC2)
        ) {
            return Err(AuthenticatorDataError::UnsupportedKey("key type is not EC2"));
        }
        if !matches!(
            self.key.alg,
            Some(coset::RegisteredLabelWithPrivate::Assigned(
                iana::Algorithm::ES256
            ))
        ) {
            return Err(AuthenticatorDataError::UnsupportedKey(
                "algorithm is not ES256",
            ));
        }

        let (mut crv, mut x, mut y) = (None, None, None);
        for (label, value) in &self.key.params {
            let coset::Label::Int(i) = label else {
                continue;
            };
            match iana::Ec2KeyParameter::from_i64(*i) {
                Some(iana::Ec2KeyParameter::Crv) => crv = value.as_integer(),
                Some(iana::Ec2KeyParameter::X) => x = value.as_bytes(),
                Some(iana::Ec2KeyParameter::Y) => y = value.as_bytes(),
                _ => (),
            }
        }

        if crv != Some(Integer::from(iana::EllipticCurve::P_256.to_i64())) {
            return Err(AuthenticatorDataError::UnsupportedKey("curve is not P-256"));
        }
        let (Some(x), Some(y)) = (x, y) else {
            return Err(AuthenticatorDataError::UnsupportedKey(
                "missing x or y coordinate",
            ));
        };
        if x.len() != COORDINATE_LEN || y.len() != COORDINATE_LEN {
            return Err(AuthenticatorDataError::UnsupportedKey(
                "coordinates are not 32 bytes long",
            ));
        }

        let mut point = [0; UNCOMPRESSED_POINT_LEN];
        point[0] = SEC1_UNCOMPRESSED_TAG;
        point[1..=COORDINATE_LEN].copy_from_slice(x);
        point[1 + COORDINATE_LEN..].copy_from_slice(y);
        Ok(point)
    }

    fn encode_into(&self, bytes: &mut Vec<u8>) -> Result<(), EncodeError> {
        let cose_key = self
            .key
            .clone()
            .to_vec()
            .map_err(|e| EncodeError(e.to_string()))?;
        let id_len = u16::try_from(self.credential_id.len())
            .map_err(|_| EncodeError("credential id longer than u16::MAX".into()))?;

        bytes.extend_from_slice(&self.aaguid.0);
        bytes.extend_from_slice(&id_len.to_be_bytes());
        bytes.extend_from_slice(&self.credential_id);
        bytes.extend_from_slice(&cose_key);
        Ok(())
    }

    fn from_reader<R: Read>(reader: &mut R) -> Result<Self, AuthenticatorDataError> {
        let mut aaguid = [0; Aaguid::LEN];
        reader
            .read_exact(&mut aaguid)
            .map_err(|_| AuthenticatorDataError::Truncated("aaguid"))?;

        let mut cred_len = [0; 2];
        reader
            .read_exact(&mut cred_len)
            .map_err(|_| AuthenticatorDataError::Truncated("credential id length"))?;
        let cred_len: usize = u16::from_be_bytes(cred_len).into();

        let mut credential_id = vec![0; cred_len];
        reader
            .read_exact(&mut credential_id)
            .map_err(|_| AuthenticatorDataError::Truncated("credential id"))?;

        let cose_val: Value = ciborium::de::from_reader(reader)
            .map_err(|e| AuthenticatorDataError::Cbor(e.to_string()))?;
        let key = CoseKey::from_cbor_value(cose_val)
            .map_err(|e| AuthenticatorDataError::CoseKey(e.to_string()))?;

        Ok(Self {
            aaguid: Aaguid(aaguid),
            credential_id,
            key,
        })
    }
}

#[cfg(test)]
mod tests;
