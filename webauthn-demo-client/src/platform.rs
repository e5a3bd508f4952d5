use serde::{Deserialize, Serialize};
use typeshare::typeshare;
use webauthn_demo_types::webauthn::{
    AuthenticatedPublicKeyCredential, CreatedPublicKeyCredential, CredentialCreationOptions,
    CredentialRequestOptions,
};

#[cfg(doc)]
use crate::Client;

/// Reasons the platform gives for rejecting a `create()` or `get()` call.
///
/// These mirror the `DOMException` names a browser rejects with.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", content = "content")]
pub enum PlatformError {
    /// The user cancelled the ceremony, or no credential was eligible.
    #[error("the operation was cancelled or is not allowed")]
    NotAllowed,
    /// The origin is not allowed to use the requested RP ID.
    #[error("the origin is not allowed to act for this relying party")]
    Security,
    /// The ceremony did not complete within the requested timeout.
    #[error("the operation timed out")]
    Timeout,
    /// A credential that may not be created again already exists.
    #[error("the authenticator is in an invalid state for this operation")]
    InvalidState,
    /// None of the requested algorithms is supported.
    #[error("none of the requested parameters are supported")]
    NotSupported,
    /// Any other rejection, with the message the platform gave.
    #[error("the platform rejected the operation: {0}")]
    Unknown(String),
}

/// The `navigator.credentials` surface the [`Client`] drives.
///
/// Implementations decide how the user is prompted and where credentials live. Both calls resolve
/// at most once per invocation.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
#[async_trait::async_trait]
pub trait CredentialsContainer {
    /// Create a new public key credential, the equivalent of `navigator.credentials.create()`.
    async fn create(
        &self,
        options: CredentialCreationOptions,
    ) -> Result<CreatedPublicKeyCredential, PlatformError>;

    /// Produce an assertion with an existing credential, the equivalent of
    /// `navigator.credentials.get()`.
    async fn get(
        &self,
        options: CredentialRequestOptions,
    ) -> Result<AuthenticatedPublicKeyCredential, PlatformError>;
}
