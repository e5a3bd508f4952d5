//! The parts of [WebAuthn Level 3] exchanged between the demo client and the platform credential
//! API: request options going in, public key credentials coming out.
//!
//! [WebAuthn Level 3]: https://w3c.github.io/webauthn

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::Bytes;

mod assertion;
mod attestation;
mod common;

// re-export types
pub use self::{assertion::*, attestation::*, common::*};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::AuthenticatorAssertionResponse {}
    impl Sealed for super::AuthenticatorAttestationResponse {}
}

/// Marker trait for response types
pub trait AuthenticatorResponse: sealed::Sealed {}

impl AuthenticatorResponse for AuthenticatorAssertionResponse {}
impl AuthenticatorResponse for AuthenticatorAttestationResponse {}

/// This is the response from a successful creation or assertion of a credential.
///
/// Use the type aliases depending on which response you are expecting:
/// * Credential Creation: [CreatedPublicKeyCredential]
/// * Credential assertion: [AuthenticatedPublicKeyCredential]
///
/// <https://w3c.github.io/webauthn/#iface-pkcredential>
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredential<R: AuthenticatorResponse> {
    /// The credential ID chosen by the authenticator, usually the base64url encoding of
    /// [Self::raw_id].
    pub id: String,

    /// The raw bytes of the credential ID.
    pub raw_id: Bytes,

    /// Always [PublicKeyCredentialType::PublicKey] for credentials this client understands.
    #[serde(rename = "type")]
    pub ty: PublicKeyCredentialType,

    /// The authenticator's response, either:
    /// * [AuthenticatorAttestationResponse] for `create()`, or
    /// * [AuthenticatorAssertionResponse] for `get()`.
    pub response: R,
}
