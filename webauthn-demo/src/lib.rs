//! # WebAuthn Demo
//!
//! A small WebAuthn client that registers a credential, authenticates with it and imports the
//! credential's public key. It is made of three libraries:
//!
//! - `webauthn-demo-types` - request, response and attestation types, usable as [`types`].
//! - `webauthn-demo-client` - the [`Client`](client::Client) controller and its lifecycle
//!   [`State`](client::State), usable as [`client`].
//! - `webauthn-demo-platform` - an in-memory [`SoftwarePlatform`](platform::SoftwarePlatform)
//!   standing in for the browser and authenticator, usable as [`platform`].
//!
//! The flow of a ceremony is:
//!
//! random challenge <-> [`Client`](client::Client) <-> [`CredentialsContainer`](client::CredentialsContainer)
//! -> [`AttestationObject`](types::ctap2::AttestationObject) -> [`ImportedKey`](client::ImportedKey)
//!
//! Every call returns a [`Snapshot`](client::Snapshot) of the state, the credential, the imported
//! key and the last error, which is all a presentation layer needs.
//!
//! A runnable demonstration binary is provided in `webauthn-demo/examples/usage.rs`.
//!
//! ### Example: registering and authenticating
//!
//! ```
//! use webauthn_demo::{
//!     client::{Client, State},
//!     platform::SoftwarePlatform,
//! };
//! use url::Url;
//!
//! # tokio_test::block_on(async {
//! let origin = Url::parse("https://demo.example").expect("Should parse");
//! // `true` answers every consent prompt with yes.
//! let client = Client::new(SoftwarePlatform::new(origin, true));
//!
//! let created = client.create().await;
//! assert_eq!(created.state, State::Created);
//! println!("imported {}", created.public_key.expect("key was imported"));
//!
//! let got = client.get().await;
//! assert_eq!(got.state, State::Got);
//! # });
//! ```

pub use webauthn_demo_client as client;
pub use webauthn_demo_platform as platform;
pub use webauthn_demo_types as types;
