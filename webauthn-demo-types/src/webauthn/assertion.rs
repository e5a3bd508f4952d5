//! Types used for public key authentication

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{webauthn::PublicKeyCredential, Bytes};

#[cfg(doc)]
use crate::{ctap2::AuthenticatorData, webauthn::PublicKeyCredentialUserEntity};

/// The response to the successful authentication of a [`PublicKeyCredential`]
#[typeshare]
pub type AuthenticatedPublicKeyCredential = PublicKeyCredential<AuthenticatorAssertionResponse>;

/// This type supplies `get()` requests with the data it needs to generate an assertion.
/// Its `challenge` member MUST be present, while its other members are OPTIONAL.
///
/// The demo never sends an allow list, so the platform prompts for any eligible discoverable
/// credential.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialrequestoptions>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredentialRequestOptions {
    /// A challenge that the authenticator signs when producing an authentication assertion.
    pub challenge: Bytes,

    /// Time, in milliseconds, the caller is willing to wait. This is a hint for the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// The RP ID claimed by the caller. If omitted, the origin's effective domain is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
}

/// This is the expected input to [`navigator.credentials.get`] when wanting to authenticate using a
/// webauthn credential.
///
/// <https://w3c.github.io/webauthn/#sctn-credentialrequestoptions-extension>
///
/// [`navigator.credentials.get`]: https://developer.mozilla.org/en-US/docs/Web/API/CredentialsContainer/get
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct CredentialRequestOptions {
    /// The key defining that this is a request for a webauthn credential.
    pub public_key: PublicKeyCredentialRequestOptions,
}

/// This type represents an authenticator's response to a client’s request for generation of a new
/// authentication assertion.
///
/// <https://w3c.github.io/webauthn/#iface-authenticatorassertionresponse>
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticatorAssertionResponse {
    /// The exact JSON serialization of the collected client data.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Bytes,

    /// The [`AuthenticatorData`] returned by the authenticator.
    pub authenticator_data: Bytes,

    /// The raw signature over `authenticatorData || sha256(clientDataJSON)`.
    pub signature: Bytes,

    /// The user handle the credential was registered with, mirroring
    /// [`PublicKeyCredentialUserEntity::id`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<Bytes>,
}
