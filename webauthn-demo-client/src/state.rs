use std::{borrow::Cow, fmt};

use serde::Serialize;
use typeshare::typeshare;
use webauthn_demo_types::{
    ctap2::{AuthenticatorDataError, DecodeError},
    webauthn::{AuthenticatedPublicKeyCredential, CreatedPublicKeyCredential},
    Bytes,
};

use crate::{ImportError, ImportedKey, PlatformError};

/// Lifecycle of the controller.
///
/// ```text
/// Ready ──create/get──▶ Loading ──▶ Created | Got | Error
///   └────(no credential API)────▶ NotSupported
/// ```
///
/// Every state, `Loading` included, may start a new ceremony. The newer invocation supersedes a
/// pending one.
#[typeshare]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Nothing has happened yet.
    #[default]
    Ready,
    /// A platform call is in flight.
    Loading,
    /// A credential was created and its public key imported.
    Created,
    /// An assertion was returned.
    Got,
    /// The last ceremony failed, see [`Snapshot::last_error`].
    Error,
    /// The environment offers no credential API.
    NotSupported,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Ready => "READY",
            State::Loading => "LOADING",
            State::Created => "CREATED",
            State::Got => "GOT",
            State::Error => "ERROR",
            State::NotSupported => "NOT_SUPPORTED",
        })
    }
}

/// The two ceremonies the controller can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Registration through `create()`.
    Create,
    /// Authentication through `get()`.
    Get,
}

impl Operation {
    /// The state a successful ceremony ends in.
    pub fn success_state(self) -> State {
        match self {
            Operation::Create => State::Created,
            Operation::Get => State::Got,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Get => "get",
        })
    }
}

/// A credential returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Returned by `create()`.
    Created(CreatedPublicKeyCredential),
    /// Returned by `get()`.
    Authenticated(AuthenticatedPublicKeyCredential),
}

impl Credential {
    /// The base64url credential identifier.
    pub fn id(&self) -> &str {
        match self {
            Credential::Created(c) => &c.id,
            Credential::Authenticated(c) => &c.id,
        }
    }

    /// The raw credential identifier.
    pub fn raw_id(&self) -> &Bytes {
        match self {
            Credential::Created(c) => &c.raw_id,
            Credential::Authenticated(c) => &c.raw_id,
        }
    }

    /// The client data JSON exactly as the platform serialized it.
    pub fn client_data_json(&self) -> &Bytes {
        match self {
            Credential::Created(c) => &c.response.client_data_json,
            Credential::Authenticated(c) => &c.response.client_data_json,
        }
    }

    /// The client data decoded as UTF-8 for display. Invalid sequences are replaced.
    pub fn client_data_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.client_data_json())
    }
}

/// Everything that can end a ceremony in [`State::Error`] or [`State::NotSupported`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The environment offers no credential API.
    #[error("the credential API is not available")]
    Unsupported,
    /// The platform rejected the call.
    #[error(transparent)]
    Platform(#[from] PlatformError),
    /// The attestation object is not valid CBOR.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The authenticator data inside the attestation object is malformed.
    #[error(transparent)]
    AuthenticatorData(#[from] AuthenticatorDataError),
    /// The credential public key could not be imported.
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// A read-only copy of the controller's state, for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Where the lifecycle is.
    pub state: State,
    /// The credential of the last successful ceremony.
    pub credential: Option<Credential>,
    /// The key imported from the last created credential.
    pub public_key: Option<ImportedKey>,
    /// Why the last ceremony failed.
    pub last_error: Option<FlowError>,
}
