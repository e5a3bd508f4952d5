//! # WebAuthn Demo Platform
//!
//! A software [`CredentialsContainer`] that keeps discoverable ES256 credentials in memory. It
//! stands in for the browser and authenticator so the demo client can run a full registration and
//! authentication without hardware.
//!
//! Registration returns a `none` attestation. Assertions are signed over
//! `authenticatorData || SHA-256(clientDataJSON)` with the credential's P-256 key, exactly as a
//! roaming authenticator would, so they can be checked with the key the client imports.

mod rp_id;
mod store;
mod user_presence;


use coset::{
    iana::{self, EnumI64},
    CoseKeyBuilder,
};
use p256::{
    ecdsa::{signature::Signer, Signature, SigningKey},
    pkcs8::EncodePublicKey,
};
use public_suffix::{PublicSuffixList, DEFAULT_PROVIDER};
use tokio::sync::Mutex;
use url::Url;
use webauthn_demo_client::{CredentialsContainer, PlatformError};
use webauthn_demo_types::{
    crypto::sha256,
    ctap2::{Aaguid, AttestationObject, AttestedCredentialData, AuthenticatorData, Flags},
    encoding,
    rand::random_vec,
    webauthn::{
        AuthenticatedPublicKeyCredential, AuthenticatorAssertionResponse,
        AuthenticatorAttestationResponse, ClientDataType, CollectedClientData,
        CreatedPublicKeyCredential, CredentialCreationOptions, CredentialRequestOptions,
        PublicKeyCredential, PublicKeyCredentialParameters, PublicKeyCredentialType,
    },
};

use self::{
    rp_id::RpIdVerifier,
    store::{MemoryStore, StoredCredential},
};

pub use self::user_presence::{Prompt, UserPresence};

#[cfg(feature = "testable")]
pub use self::user_presence::MockUserPresence;

const CREDENTIAL_ID_LEN: usize = 16;

/// An in-memory platform authenticator bound to a single origin.
///
/// RP IDs are checked against the origin with a [`public_suffix::EffectiveTLDProvider`]. Most
/// applications use [`SoftwarePlatform::new`], which uses the Mozilla Public Suffix List.
pub struct SoftwarePlatform<U, P = PublicSuffixList> {
    origin: Url,
    aaguid: Aaguid,
    rp_id_verifier: RpIdVerifier<P>,
    user_presence: U,
    store: Mutex<MemoryStore>,
}

impl<U> SoftwarePlatform<U>
where
    U: UserPresence + Sync,
{
    /// Create a platform that serves requests from `origin` and asks `user_presence` for consent.
    pub fn new(origin: Url, user_presence: U) -> Self {
        Self::new_with_custom_tld_provider(origin, user_presence, DEFAULT_PROVIDER)
    }
}

impl<U, P> SoftwarePlatform<U, P>
where
    U: UserPresence + Sync,
    P: public_suffix::EffectiveTLDProvider + Sync + 'static,
{
    /// Create a platform that decides which RP IDs are registrable domains with `tld_provider`.
    pub fn new_with_custom_tld_provider(origin: Url, user_presence: U, tld_provider: P) -> Self {
        Self {
            origin,
            aaguid: Aaguid::new_empty(),
            rp_id_verifier: RpIdVerifier::new(tld_provider),
            user_presence,
            store: Mutex::new(MemoryStore::default()),
        }
    }

    /// Report `aaguid` in attested credential data instead of all zeroes.
    pub fn with_aaguid(mut self, aaguid: Aaguid) -> Self {
        self.aaguid = aaguid;
        self
    }

    /// Accept `http://localhost` origins.
    pub fn allows_insecure_localhost(mut self, is_allowed: bool) -> Self {
        self.rp_id_verifier = self.rp_id_verifier.allows_insecure_localhost(is_allowed);
        self
    }

    /// The origin requests are made from.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Number of credentials stored for `rp_id`.
    pub async fn credential_count(&self, rp_id: &str) -> usize {
        self.store.lock().await.count_for(rp_id)
    }

    fn client_data_json(
        &self,
        ty: ClientDataType,
        challenge: &[u8],
    ) -> Result<Vec<u8>, PlatformError> {
        let client_data = CollectedClientData {
            ty,
            challenge: encoding::base64url(challenge),
            origin: self.origin.origin().ascii_serialization(),
            cross_origin: None,
            unknown_keys: Default::default(),
        };
        serde_json::to_vec(&client_data).map_err(unknown)
    }
}

fn unknown(e: impl std::fmt::Display) -> PlatformError {
    PlatformError::Unknown(e.to_string())
}

#[async_trait::async_trait]
impl<U, P> CredentialsContainer for SoftwarePlatform<U, P>
where
    U: UserPresence + Sync,
    P: public_suffix::EffectiveTLDProvider + Sync + 'static,
{
    async fn create(
        &self,
        options: CredentialCreationOptions,
    ) -> Result<CreatedPublicKeyCredential, PlatformError> {
        let request = options.public_key;
        let rp_id = self
            .rp_id_verifier
            .assert_domain(&self.origin, request.rp.id.as_deref())?;

        let params = if request.pub_key_cred_params.is_empty() {
            PublicKeyCredentialParameters::default_algorithms()
        } else {
            request.pub_key_cred_params
        };
        if !params.contains(&PublicKeyCredentialParameters::ES256) {
            return Err(PlatformError::NotSupported);
        }

        let prompt = Prompt::Register {
            rp_id: rp_id.into(),
            user_name: request.user.name.clone(),
        };
        if !self.user_presence.confirm(prompt).await {
            return Err(PlatformError::NotAllowed);
        }

        let private_key = SigningKey::random(&mut rand::thread_rng());
        let verifying_key = private_key.verifying_key();
        let point = verifying_key.to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            return Err(PlatformError::Unknown("public key point is compressed".into()));
        };
        let cose_key =
            CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, x.to_vec(), y.to_vec())
                .algorithm(iana::Algorithm::ES256)
                .build();

        let credential_id = random_vec(CREDENTIAL_ID_LEN);
        let acd = AttestedCredentialData::new(self.aaguid, credential_id.clone(), cose_key)
            .map_err(unknown)?;
        let auth_data = AuthenticatorData::new(rp_id, 0)
            .set_flags(Flags::UP | Flags::UV)
            .set_attested_credential_data(acd);

        let authenticator_data = auth_data.to_vec().map_err(unknown)?;
        let attestation_object = AttestationObject::none(&auth_data)
            .and_then(|object| object.to_vec())
            .map_err(unknown)?;
        let public_key = verifying_key.to_public_key_der().map_err(unknown)?;
        let client_data_json = self.client_data_json(ClientDataType::Create, &request.challenge)?;

        let mut store = self.store.lock().await;
        store.save(StoredCredential {
            credential_id: credential_id.clone().into(),
            rp_id: rp_id.into(),
            user_handle: request.user.id,
            private_key,
            counter: 0,
        });
        log::info!(
            "registered credential for {rp_id}, {} stored in total",
            store.len()
        );

        Ok(PublicKeyCredential {
            id: encoding::base64url(&credential_id),
            raw_id: credential_id.into(),
            ty: PublicKeyCredentialType::PublicKey,
            response: AuthenticatorAttestationResponse {
                client_data_json: client_data_json.into(),
                authenticator_data: authenticator_data.into(),
                public_key: Some(public_key.as_bytes().into()),
                public_key_algorithm: iana::Algorithm::ES256.to_i64(),
                attestation_object: attestation_object.into(),
            },
        })
    }

    async fn get(
        &self,
        options: CredentialRequestOptions,
    ) -> Result<AuthenticatedPublicKeyCredential, PlatformError> {
        let request = options.public_key;
        let rp_id = self
            .rp_id_verifier
            .assert_domain(&self.origin, request.rp_id.as_deref())?;

        let available = self.store.lock().await.count_for(rp_id);
        if available == 0 {
            log::warn!("no credential stored for {rp_id}");
            return Err(PlatformError::NotAllowed);
        }

        let prompt = Prompt::Authenticate {
            rp_id: rp_id.into(),
            available,
        };
        if !self.user_presence.confirm(prompt).await {
            return Err(PlatformError::NotAllowed);
        }

        let client_data_json = self.client_data_json(ClientDataType::Get, &request.challenge)?;

        let mut store = self.store.lock().await;
        let credential = store
            .latest_for_mut(rp_id)
            .ok_or(PlatformError::NotAllowed)?;
        credential.counter = credential.counter.saturating_add(1);

        let authenticator_data = AuthenticatorData::new(rp_id, credential.counter)
            .set_flags(Flags::UP | Flags::UV)
            .to_vec()
            .map_err(unknown)?;

        let mut signature_target = authenticator_data.clone();
        signature_target.extend_from_slice(&sha256(&client_data_json));
        let signature: Signature = credential.private_key.sign(&signature_target);

        log::info!(
            "signed assertion for {rp_id} with counter {}",
            credential.counter
        );

        Ok(PublicKeyCredential {
            id: encoding::base64url(&credential.credential_id),
            raw_id: credential.credential_id.clone(),
            ty: PublicKeyCredentialType::PublicKey,
            response: AuthenticatorAssertionResponse {
                client_data_json: client_data_json.into(),
                authenticator_data: authenticator_data.into(),
                signature: signature.to_der().as_bytes().into(),
                user_handle: Some(credential.user_handle.clone()),
            },
        })
    }
}
