//! Types specific to public key credential creation
use coset::iana;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{
    utils::serde::{i64_to_iana, ignore_unknown},
    webauthn::{PublicKeyCredential, PublicKeyCredentialType},
    Bytes,
};

#[cfg(doc)]
use crate::ctap2::{AttestationObject, AuthenticatorData};

/// The response to the successful creation of a PublicKeyCredential
#[typeshare]
pub type CreatedPublicKeyCredential = PublicKeyCredential<AuthenticatorAttestationResponse>;

/// This is the expected input to [`navigator.credentials.create`] when wanting to create a webauthn
/// credential.
///
/// <https://w3c.github.io/webauthn/#sctn-credentialcreationoptions-extension>
///
/// [`navigator.credentials.create`]: https://developer.mozilla.org/en-US/docs/Web/API/CredentialsContainer/create
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct CredentialCreationOptions {
    /// The key defining that this is a request for a webauthn credential.
    pub public_key: PublicKeyCredentialCreationOptions,
}

/// This defines the request for creating a [`PublicKeyCredential`].
///
/// Only the members the demo sends are modelled; every other member of the dictionary keeps its
/// default value on the platform side.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialcreationoptions>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredentialCreationOptions {
    /// Name and optional identifier of the Relying Party responsible for the request.
    pub rp: PublicKeyCredentialRpEntity,

    /// Names and identifier for the user account performing the registration.
    pub user: PublicKeyCredentialUserEntity,

    /// A challenge that the authenticator signs, along with other data, when producing the
    /// attestation for the newly created credential.
    pub challenge: Bytes,

    /// Key types and signature algorithms the Relying Party supports, most preferred first.
    /// An empty list lets the platform fall back to [`PublicKeyCredentialParameters::default_algorithms`].
    #[serde(default)]
    pub pub_key_cred_params: Vec<PublicKeyCredentialParameters>,

    /// Time, in milliseconds, the caller is willing to wait. This is a hint for the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// This type is used to supply additional Relying Party attributes when creating a new credential.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialrpentity>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[typeshare]
pub struct PublicKeyCredentialRpEntity {
    /// A unique identifier for the Relying Party entity, which sets the RP ID. If omitted, the
    /// requesting origin's effective domain is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// A human palatable identifier for the Relying Party, intended only for display.
    pub name: String,
}

/// This type is used to supply additional user account attributes when creating a new credential.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialuserentity>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct PublicKeyCredentialUserEntity {
    /// The opaque user handle. It MUST NOT be empty and MUST NOT contain personally identifying
    /// information.
    pub id: Bytes,

    /// A human-palatable name for the user account, intended only for display.
    pub display_name: String,

    /// A human-palatable identifier for the user account, e.g. a username.
    pub name: String,
}

/// This type is used to supply additional parameters when creating a new credential.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialparameters>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[typeshare]
pub struct PublicKeyCredentialParameters {
    /// The type of credential to be created.
    #[serde(rename = "type", deserialize_with = "ignore_unknown")]
    pub ty: PublicKeyCredentialType,

    /// The COSE signature algorithm the new credential will be used with.
    #[serde(with = "i64_to_iana")]
    #[typeshare(serialized_as = "I54")] // because i64 fails for js
    pub alg: iana::Algorithm,
}

impl PublicKeyCredentialParameters {
    /// ECDSA with SHA-256 over P-256, COSE identifier `-7`.
    pub const ES256: Self = Self {
        ty: PublicKeyCredentialType::PublicKey,
        alg: iana::Algorithm::ES256,
    };

    /// The algorithms a platform assumes when
    /// [`PublicKeyCredentialCreationOptions::pub_key_cred_params`] comes in empty.
    ///
    /// <https://w3c.github.io/webauthn/#ref-for-list-size>
    pub fn default_algorithms() -> Vec<Self> {
        vec![
            Self::ES256,
            Self {
                ty: PublicKeyCredentialType::PublicKey,
                alg: iana::Algorithm::RS256,
            },
        ]
    }
}

/// The [`AuthenticatorAttestationResponse`] represents the authenticator's response to a client’s
/// request for the creation of a new public key credential.
///
/// <https://w3c.github.io/webauthn/#iface-authenticatorattestationresponse>
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticatorAttestationResponse {
    /// The exact JSON serialization of the collected client data. Its hash is what the
    /// authenticator signed, so it must be kept byte for byte.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Bytes,

    /// The [`AuthenticatorData`] also found inside [`Self::attestation_object`].
    pub authenticator_data: Bytes,

    /// The DER SubjectPublicKeyInfo of the new credential, if the platform provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Bytes>,

    /// The COSE algorithm identifier of the new credential.
    #[typeshare(serialized_as = "I54")] // because i64 fails for js
    pub public_key_algorithm: i64,

    /// The CBOR encoded [`AttestationObject`], opaque to the client.
    pub attestation_object: Bytes,
}
