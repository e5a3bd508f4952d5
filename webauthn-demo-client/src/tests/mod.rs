use coset::{
    iana::{self, EnumI64},
    CoseKeyBuilder,
};
use p256::ecdsa::SigningKey;
use webauthn_demo_types::{
    ctap2::{
        Aaguid, AttestedCredentialData, AuthenticatorData, AuthenticatorDataError, DecodeError,
        Flags,
    },
    encoding,
    rand::{random_vec, BYTE_UPPER_BOUND},
    webauthn::{
        AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, PublicKeyCredential,
        PublicKeyCredentialType,
    },
    Bytes,
};

use super::*;
use crate::{key_import::MockKeyImporter, platform::MockCredentialsContainer};


const CLIENT_DATA_JSON: &str =
    r#"{"type":"webauthn.create","challenge":"AAEC","origin":"https://demo.example","crossOrigin":false}"#;

/// Authenticator data with a freshly generated P-256 key, the way an authenticator would hand it
/// back from `create()`.
fn registration_auth_data() -> (AuthenticatorData, SigningKey) {
    let private_key = SigningKey::random(&mut rand::thread_rng());
    let point = private_key.verifying_key().to_encoded_point(false);
    let (Some(x), Some(y)) = (point.x(), point.y()) else {
        panic!("uncompressed points have both coordinates");
    };
    let key = CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, x.to_vec(), y.to_vec())
        .algorithm(iana::Algorithm::ES256)
        .build();
    let acd = AttestedCredentialData::new(Aaguid::new_empty(), random_vec(16), key)
        .expect("short credential id");
    let auth_data = AuthenticatorData::new("demo.example", 0)
        .set_flags(Flags::UP | Flags::UV)
        .set_attested_credential_data(acd);
    (auth_data, private_key)
}

fn created_credential(id: &str, attestation_object: Vec<u8>) -> CreatedPublicKeyCredential {
    PublicKeyCredential {
        id: id.into(),
        raw_id: encoding::try_from_base64url(id)
            .unwrap_or_default()
            .into(),
        ty: PublicKeyCredentialType::PublicKey,
        response: AuthenticatorAttestationResponse {
            client_data_json: CLIENT_DATA_JSON.as_bytes().into(),
            authenticator_data: Bytes::default(),
            public_key: None,
            public_key_algorithm: iana::Algorithm::ES256.to_i64(),
            attestation_object: attestation_object.into(),
        },
    }
}

fn valid_created_credential() -> (CreatedPublicKeyCredential, SigningKey) {
    let (auth_data, private_key) = registration_auth_data();
    let attestation_object = AttestationObject::none(&auth_data)
        .and_then(|object| object.to_vec())
        .expect("could not encode");
    (created_credential("abc", attestation_object), private_key)
}

fn authenticated_credential(id: &str) -> AuthenticatedPublicKeyCredential {
    PublicKeyCredential {
        id: id.into(),
        raw_id: encoding::try_from_base64url(id)
            .unwrap_or_default()
            .into(),
        ty: PublicKeyCredentialType::PublicKey,
        response: AuthenticatorAssertionResponse {
            client_data_json: br#"{"type":"webauthn.get"}"#.to_vec().into(),
            authenticator_data: random_vec(37).into(),
            signature: random_vec(64).into(),
            user_handle: None,
        },
    }
}

#[tokio::test]
async fn create_stores_credential_and_key() {
    let (credential, private_key) = valid_created_credential();
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_create()
        .withf(|options| {
            let options = &options.public_key;
            options.challenge.len() == 8
                && options.user.id.len() == 8
                && options.rp.name == "RP_NAME"
                && options.user.name == "USER_NAME"
                && options.user.display_name == "USER_DISPLAY_NAME"
                && options.pub_key_cred_params == [PublicKeyCredentialParameters::ES256]
        })
        .return_once(move |_| Ok(credential))
        .times(1);
    platform.expect_get().never();
    let client = Client::new(platform);

    let snapshot = client.create().await;

    assert_eq!(snapshot.state, State::Created);
    assert_eq!(snapshot.last_error, None);
    let credential = snapshot.credential.as_ref().expect("credential is stored");
    assert_eq!(credential.id(), "abc");
    assert_eq!(credential.client_data_text(), CLIENT_DATA_JSON);
    let key = snapshot.public_key.expect("key is imported");
    assert_eq!(key.verifying_key(), private_key.verifying_key());
    assert_eq!(client.snapshot(), snapshot);
}

#[tokio::test]
async fn get_stores_assertion() {
    let mut platform = MockCredentialsContainer::new();
    platform.expect_create().never();
    platform
        .expect_get()
        .withf(|options| options.public_key.challenge.len() == 8)
        .returning(|_| Ok(authenticated_credential("abc")))
        .times(1);
    let mut importer = MockKeyImporter::new();
    importer.expect_import_verify_key().never();
    let client = Client::new(platform).with_key_importer(importer);

    let snapshot = client.get().await;

    assert_eq!(snapshot.state, State::Got);
    assert!(matches!(
        snapshot.credential,
        Some(Credential::Authenticated(_))
    ));
    assert_eq!(snapshot.credential.as_ref().map(Credential::id), Some("abc"));
    assert_eq!(snapshot.public_key, None);
}

#[tokio::test]
async fn unavailable_api_never_calls_the_platform() {
    let mut platform = MockCredentialsContainer::new();
    platform.expect_create().never();
    platform.expect_get().never();
    let client = Client::new(platform).with_probe(Capability::Unavailable);

    let snapshot = client.get().await;
    assert_eq!(snapshot.state, State::NotSupported);
    assert_eq!(snapshot.last_error, Some(FlowError::Unsupported));

    let snapshot = client.create().await;
    assert_eq!(snapshot.state, State::NotSupported);
    assert_eq!(snapshot.credential, None);
}

#[tokio::test]
async fn unknown_capability_attempts_the_call() {
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_get()
        .returning(|_| Ok(authenticated_credential("abc")))
        .times(1);
    let client = Client::new(platform).with_probe(Capability::Unknown);

    assert_eq!(client.get().await.state, State::Got);
}

#[test]
fn begin_enters_loading_before_the_platform_resolves() {
    let mut platform = MockCredentialsContainer::new();
    platform.expect_create().never();
    platform.expect_get().never();
    let client = Client::new(platform);
    assert_eq!(client.snapshot().state, State::Ready);

    let invocation = client.begin(Operation::Create).expect("API is available");

    assert_eq!(client.snapshot().state, State::Loading);
    assert_eq!(invocation.operation(), Operation::Create);
    assert!(invocation
        .challenge()
        .iter()
        .all(|b| *b < BYTE_UPPER_BOUND));

    let options = client.creation_options(&invocation);
    assert_eq!(options.public_key.challenge.as_slice(), invocation.challenge());
    assert_eq!(options.public_key.user.id.as_slice(), invocation.user_id());
    assert_eq!(options.public_key.timeout, None);
}

#[test]
fn config_flows_into_requests() {
    let client = Client::new(MockCredentialsContainer::new()).with_config(
        ClientConfig::default()
            .rp_name("Demo RP")
            .rp_id("demo.example")
            .user("wendy", "Wendy")
            .timeout(30_000),
    );
    let invocation = client.begin(Operation::Get).expect("API is available");

    let creation = client.creation_options(&invocation).public_key;
    assert_eq!(creation.rp.name, "Demo RP");
    assert_eq!(creation.rp.id.as_deref(), Some("demo.example"));
    assert_eq!(creation.user.name, "wendy");
    assert_eq!(creation.user.display_name, "Wendy");
    assert_eq!(creation.timeout, Some(30_000));

    let request = client.request_options(&invocation).public_key;
    assert_eq!(request.rp_id.as_deref(), Some("demo.example"));
    assert_eq!(request.timeout, Some(30_000));
}

#[test]
fn every_invocation_uses_fresh_buffers() {
    let client = Client::new(MockCredentialsContainer::new());

    let first = client.begin(Operation::Create).expect("API is available");
    let second = client.begin(Operation::Create).expect("API is available");

    // 8 random bytes colliding twice in a row is not a realistic outcome
    assert!(first.challenge() != second.challenge() || first.user_id() != second.user_id());
}

#[tokio::test]
async fn cancellation_clears_the_previous_credential() {
    let (credential, _) = valid_created_credential();
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_create()
        .return_once(move |_| Ok(credential))
        .times(1);
    platform
        .expect_get()
        .returning(|_| Err(PlatformError::NotAllowed))
        .times(1);
    let client = Client::new(platform);
    assert_eq!(client.create().await.state, State::Created);

    let snapshot = client.get().await;

    assert_eq!(snapshot.state, State::Error);
    assert_eq!(snapshot.credential, None);
    assert_eq!(snapshot.public_key, None);
    assert_eq!(
        snapshot.last_error,
        Some(FlowError::Platform(PlatformError::NotAllowed))
    );
}

#[tokio::test]
async fn create_rejection_is_an_error() {
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_create()
        .returning(|_| Err(PlatformError::NotAllowed))
        .times(1);
    let client = Client::new(platform);

    let snapshot = client.create().await;

    assert_eq!(snapshot.state, State::Error);
    assert_eq!(snapshot.credential, None);
}

#[tokio::test]
async fn malformed_attestation_object_is_an_error() {
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_create()
        .returning(|_| Ok(created_credential("abc", vec![0xa1, 0x63])))
        .times(1);
    let mut importer = MockKeyImporter::new();
    importer.expect_import_verify_key().never();
    let client = Client::new(platform).with_key_importer(importer);

    let snapshot = client.create().await;

    assert_eq!(snapshot.state, State::Error);
    assert_eq!(snapshot.credential, None);
    assert!(matches!(
        snapshot.last_error,
        Some(FlowError::Decode(DecodeError::Cbor(_)))
    ));
}

#[tokio::test]
async fn attestation_without_credential_data_is_an_error() {
    let auth_data = AuthenticatorData::new("demo.example", 0).set_flags(Flags::UP);
    let attestation_object = AttestationObject::none(&auth_data)
        .and_then(|object| object.to_vec())
        .expect("could not encode");
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_create()
        .return_once(move |_| Ok(created_credential("abc", attestation_object)))
        .times(1);
    let client = Client::new(platform);

    let snapshot = client.create().await;

    assert_eq!(snapshot.state, State::Error);
    assert_eq!(
        snapshot.last_error,
        Some(FlowError::AuthenticatorData(
            AuthenticatorDataError::MissingAttestedCredentialData
        ))
    );
}

#[tokio::test]
async fn import_failure_is_an_error() {
    let (credential, _) = valid_created_credential();
    let mut platform = MockCredentialsContainer::new();
    platform
        .expect_create()
        .return_once(move |_| Ok(credential))
        .times(1);
    let mut importer = MockKeyImporter::new();
    importer
        .expect_import_verify_key()
        .withf(|raw| raw.len() == 65 && raw[0] == 0x04)
        .returning(|_| Err(ImportError::MalformedPoint))
        .times(1);
    let client = Client::new(platform).with_key_importer(importer);

    let snapshot = client.create().await;

    assert_eq!(snapshot.state, State::Error);
    assert_eq!(snapshot.credential, None);
    assert_eq!(
        snapshot.last_error,
        Some(FlowError::Import(ImportError::MalformedPoint))
    );
}

#[tokio::test]
async fn error_state_can_be_left() {
    let mut platform = MockCredentialsContainer::new();
    let mut seq = mockall::Sequence::new();
    platform
        .expect_get()
        .returning(|_| Err(PlatformError::Timeout))
        .times(1)
        .in_sequence(&mut seq);
    platform
        .expect_get()
        .returning(|_| Ok(authenticated_credential("abc")))
        .times(1)
        .in_sequence(&mut seq);
    let client = Client::new(platform);

    assert_eq!(client.get().await.state, State::Error);
    let snapshot = client.get().await;

    assert_eq!(snapshot.state, State::Got);
    assert_eq!(snapshot.last_error, None);
}
