//! # WebAuthn Demo Client
//!
//! This crate defines a [`Client`] that registers a credential and then authenticates with it
//! through a [`CredentialsContainer`], the platform's `navigator.credentials` surface. The client
//! builds the request options, tracks the lifecycle in a [`State`], decodes the attestation object
//! returned on registration and imports the credential's public key with a [`KeyImporter`].
//!
//! It performs no verification of attestation statements or assertions, and talks to no server.
//!
//! ```text
//! random buffers ─▶ create()/get() ─▶ state commit ─▶ attestation decode ─▶ key import
//! ```

mod capability;
mod config;
mod key_import;
mod platform;
mod state;

#[cfg(test)]
mod tests;

use std::sync::{Mutex, MutexGuard, PoisonError};

use webauthn_demo_types::{
    ctap2::AttestationObject,
    rand::{random_buffer, Buffer},
    webauthn::{
        AuthenticatedPublicKeyCredential, CreatedPublicKeyCredential, CredentialCreationOptions,
        CredentialRequestOptions, PublicKeyCredentialCreationOptions,
        PublicKeyCredentialParameters, PublicKeyCredentialRequestOptions,
        PublicKeyCredentialRpEntity, PublicKeyCredentialUserEntity,
    },
};

pub use self::{
    capability::{Capability, CapabilityProbe},
    config::ClientConfig,
    key_import::{ImportError, ImportedKey, KeyAlgorithm, KeyImporter, KeyUsage, P256KeyImporter},
    platform::{CredentialsContainer, PlatformError},
    state::{Credential, FlowError, Operation, Snapshot, State},
};

#[cfg(feature = "testable")]
pub use self::{key_import::MockKeyImporter, platform::MockCredentialsContainer};

/// A ceremony that entered [`State::Loading`] and has not been committed yet.
///
/// Obtained from [`Client::begin`], it carries the random buffers for the request and the
/// generation that decides whether its outcome is still current when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    operation: Operation,
    generation: u64,
    challenge: Buffer,
    user_id: Buffer,
}

impl Invocation {
    /// Which ceremony this is.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The challenge sent to the platform.
    pub fn challenge(&self) -> &Buffer {
        &self.challenge
    }

    /// The user handle sent with a registration.
    pub fn user_id(&self) -> &Buffer {
        &self.user_id
    }
}

#[derive(Default)]
struct Inner {
    snapshot: Snapshot,
    generation: u64,
}

/// Drives registration and authentication against a platform and holds the resulting state.
///
/// All methods take `&self`, so ceremonies may overlap. Only the most recently started one is
/// committed; the outcome of an older one is logged and dropped.
pub struct Client<P, K = P256KeyImporter>
where
    P: CredentialsContainer + Sync,
    K: KeyImporter + Sync,
{
    platform: P,
    probe: Box<dyn CapabilityProbe + Send + Sync>,
    key_importer: K,
    config: ClientConfig,
    inner: Mutex<Inner>,
}

impl<P> Client<P>
where
    P: CredentialsContainer + Sync,
{
    /// Create a `Client` for a platform that is assumed to offer the credential API, with the
    /// default [`ClientConfig`] and the [`P256KeyImporter`].
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            probe: Box::new(Capability::Available),
            key_importer: P256KeyImporter,
            config: ClientConfig::default(),
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl<P, K> Client<P, K>
where
    P: CredentialsContainer + Sync,
    K: KeyImporter + Sync,
{
    /// Check for the credential API with `probe` at the start of every ceremony.
    pub fn with_probe(mut self, probe: impl CapabilityProbe + Send + Sync + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Replace the names and hints sent with every request.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Import credential public keys with `key_importer`.
    pub fn with_key_importer<K2>(self, key_importer: K2) -> Client<P, K2>
    where
        K2: KeyImporter + Sync,
    {
        Client {
            platform: self.platform,
            probe: self.probe,
            key_importer,
            config: self.config,
            inner: self.inner,
        }
    }

    /// Read access to the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read access to the platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// A copy of the current state, credential, key and error.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }

    /// Register a new credential.
    ///
    /// On success the state is [`State::Created`] and both the credential and its imported
    /// public key are stored.
    pub async fn create(&self) -> Snapshot {
        let invocation = match self.begin(Operation::Create) {
            Ok(invocation) => invocation,
            Err(snapshot) => return snapshot,
        };
        let result = self
            .platform
            .create(self.creation_options(&invocation))
            .await;
        self.complete_create(&invocation, result).await
    }

    /// Authenticate with any credential the platform offers.
    ///
    /// On success the state is [`State::Got`] and the assertion is stored.
    pub async fn get(&self) -> Snapshot {
        let invocation = match self.begin(Operation::Get) {
            Ok(invocation) => invocation,
            Err(snapshot) => return snapshot,
        };
        let result = self.platform.get(self.request_options(&invocation)).await;
        self.complete_get(&invocation, result)
    }

    /// Start a ceremony without calling the platform.
    ///
    /// When the probe reports [`Capability::Unavailable`] the state becomes
    /// [`State::NotSupported`], any earlier credential and key are cleared, and the resulting
    /// snapshot is returned as the error. Otherwise the
    /// state is [`State::Loading`] by the time this returns.
    pub fn begin(&self, operation: Operation) -> Result<Invocation, Snapshot> {
        let capability = self.probe.probe();
        let mut inner = self.lock();
        inner.generation += 1;

        if !capability.allows_call() {
            log::warn!("{operation}: no credential API available");
            transition(&mut inner.snapshot, State::NotSupported);
            inner.snapshot.last_error = Some(FlowError::Unsupported);
            inner.snapshot.credential = None;
            inner.snapshot.public_key = None;
            return Err(inner.snapshot.clone());
        }

        transition(&mut inner.snapshot, State::Loading);
        inner.snapshot.last_error = None;
        Ok(Invocation {
            operation,
            generation: inner.generation,
            challenge: random_buffer(),
            user_id: random_buffer(),
        })
    }

    /// The registration request for `invocation`.
    pub fn creation_options(&self, invocation: &Invocation) -> CredentialCreationOptions {
        CredentialCreationOptions {
            public_key: PublicKeyCredentialCreationOptions {
                rp: PublicKeyCredentialRpEntity {
                    id: self.config.rp_id.clone(),
                    name: self.config.rp_name.clone(),
                },
                user: PublicKeyCredentialUserEntity {
                    id: invocation.user_id.into(),
                    display_name: self.config.user_display_name.clone(),
                    name: self.config.user_name.clone(),
                },
                challenge: invocation.challenge.into(),
                pub_key_cred_params: vec![PublicKeyCredentialParameters::ES256],
                timeout: self.config.timeout,
            },
        }
    }

    /// The authentication request for `invocation`.
    pub fn request_options(&self, invocation: &Invocation) -> CredentialRequestOptions {
        CredentialRequestOptions {
            public_key: PublicKeyCredentialRequestOptions {
                challenge: invocation.challenge.into(),
                timeout: self.config.timeout,
                rp_id: self.config.rp_id.clone(),
            },
        }
    }

    /// Commit the outcome of a registration started with [`Client::begin`].
    ///
    /// A resolved credential is decoded and its public key imported before the commit; failing
    /// either step ends in [`State::Error`] like a platform rejection does.
    pub async fn complete_create(
        &self,
        invocation: &Invocation,
        result: Result<CreatedPublicKeyCredential, PlatformError>,
    ) -> Snapshot {
        let outcome = match result {
            Ok(credential) => self
                .import_public_key(&credential)
                .await
                .map(|key| (Credential::Created(credential), Some(key))),
            Err(e) => Err(e.into()),
        };
        self.commit(invocation, Operation::Create, outcome)
    }

    /// Commit the outcome of an authentication started with [`Client::begin`].
    pub fn complete_get(
        &self,
        invocation: &Invocation,
        result: Result<AuthenticatedPublicKeyCredential, PlatformError>,
    ) -> Snapshot {
        let outcome = result
            .map(|credential| (Credential::Authenticated(credential), None))
            .map_err(FlowError::from);
        self.commit(invocation, Operation::Get, outcome)
    }

    async fn import_public_key(
        &self,
        credential: &CreatedPublicKeyCredential,
    ) -> Result<ImportedKey, FlowError> {
        let attestation = AttestationObject::decode(&credential.response.attestation_object)?;
        let point = attestation.credential_public_key_point()?;
        let key = self.key_importer.import_verify_key(&point).await?;
        log::info!("imported {key} for credential {}", credential.id);
        Ok(key)
    }

    fn commit(
        &self,
        invocation: &Invocation,
        operation: Operation,
        outcome: Result<(Credential, Option<ImportedKey>), FlowError>,
    ) -> Snapshot {
        let mut inner = self.lock();
        if invocation.generation != inner.generation || invocation.operation != operation {
            log::warn!(
                "{operation}: dropping outcome of invocation {} superseded by {}",
                invocation.generation,
                inner.generation
            );
            return inner.snapshot.clone();
        }

        let snapshot = &mut inner.snapshot;
        match outcome {
            Ok((credential, public_key)) => {
                log::info!("{operation}: received credential {}", credential.id());
                transition(snapshot, operation.success_state());
                snapshot.credential = Some(credential);
                snapshot.public_key = public_key;
                snapshot.last_error = None;
            }
            Err(e) => {
                log::warn!("{operation}: {e}");
                transition(snapshot, State::Error);
                snapshot.credential = None;
                snapshot.public_key = None;
                snapshot.last_error = Some(e);
            }
        }
        snapshot.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn transition(snapshot: &mut Snapshot, to: State) {
    log::debug!("state {} -> {to}", snapshot.state);
    snapshot.state = to;
}
