//! Turning raw public key bytes into a key that can verify assertions.

use std::fmt;

use p256::{ecdsa::VerifyingKey, pkcs8::EncodePublicKey};
use webauthn_demo_types::{ctap2::UNCOMPRESSED_POINT_LEN, encoding, Bytes};

/// The key could not be imported or exported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// The bytes are not an uncompressed point on the P-256 curve.
    #[error("public key is not an uncompressed P-256 point")]
    MalformedPoint,
    /// The key could not be written as a SubjectPublicKeyInfo.
    #[error("could not encode public key: {0}")]
    Encoding(String),
}

/// Algorithm parameters of an imported key, named the way WebCrypto names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAlgorithm {
    /// Algorithm family, e.g. `ECDSA`.
    pub name: &'static str,
    /// Curve the key lives on, e.g. `P-256`.
    pub named_curve: &'static str,
}

impl KeyAlgorithm {
    /// ECDSA over the NIST P-256 curve, the only algorithm the demo requests.
    pub const ECDSA_P256: Self = Self {
        name: "ECDSA",
        named_curve: "P-256",
    };
}

/// What an imported key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    /// Check signatures.
    Verify,
}

/// A public key handle, usable for verification only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportedKey {
    key: VerifyingKey,
}

impl ImportedKey {
    /// The algorithm and curve the key is bound to.
    pub fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::ECDSA_P256
    }

    /// The operations the key allows.
    pub fn usages(&self) -> &'static [KeyUsage] {
        &[KeyUsage::Verify]
    }

    /// Whether the key material can be exported.
    pub fn extractable(&self) -> bool {
        true
    }

    /// The underlying verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Export as an uncompressed SEC1 point, the `raw` WebCrypto format.
    pub fn export_raw(&self) -> Bytes {
        self.key.to_encoded_point(false).as_bytes().into()
    }

    /// Export as a DER encoded SubjectPublicKeyInfo.
    pub fn export_spki_der(&self) -> Result<Bytes, ImportError> {
        self.key
            .to_public_key_der()
            .map(|der| der.as_bytes().into())
            .map_err(|e| ImportError::Encoding(e.to_string()))
    }
}

impl fmt::Display for ImportedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = self.algorithm();
        write!(
            f,
            "{} {} verify key {}",
            algorithm.name,
            algorithm.named_curve,
            encoding::base64url(&self.export_raw())
        )
    }
}

/// Import raw public key bytes as a verification key.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
#[async_trait::async_trait]
pub trait KeyImporter {
    /// Import `raw`, an uncompressed SEC1 point.
    async fn import_verify_key(&self, raw: &[u8]) -> Result<ImportedKey, ImportError>;
}

/// Imports ECDSA P-256 keys with the RustCrypto `p256` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct P256KeyImporter;

#[async_trait::async_trait]
impl KeyImporter for P256KeyImporter {
    async fn import_verify_key(&self, raw: &[u8]) -> Result<ImportedKey, ImportError> {
        if raw.len() != UNCOMPRESSED_POINT_LEN || raw.first() != Some(&0x04) {
            return Err(ImportError::MalformedPoint);
        }
        let key = VerifyingKey::from_sec1_bytes(raw).map_err(|_| ImportError::MalformedPoint)?;
        Ok(ImportedKey { key })
    }
}
