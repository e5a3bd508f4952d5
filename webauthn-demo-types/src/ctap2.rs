//! The binary structures an authenticator hands back through the platform: the [`AttestationObject`]
//! returned by `create()` and the [`AuthenticatorData`] embedded in it (and in every assertion).
//!
//! Both are defined by [WebAuthn Level 3] and encoded following the [CTAP 2.0] canonical CBOR rules.
//!
//! [CTAP 2.0]: https://fidoalliance.org/specs/fido-v2.0-ps-20190130/fido-client-to-authenticator-protocol-v2.0-ps-20190130.html
//! [WebAuthn Level 3]: https://w3c.github.io/webauthn

mod aaguid;
mod attestation_fmt;
mod attestation_object;
mod error;
mod flags;

pub use self::{aaguid::*, attestation_fmt::*, attestation_object::*, error::*, flags::*};
