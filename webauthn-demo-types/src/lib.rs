//! # WebAuthn Demo Types
//!
//! Rust type definitions for the subset of the `webauthn` and `CTAP` specifications that the
//! demo client speaks: the `create()`/`get()` request options, the credentials they return, and
//! the binary formats hidden inside those credentials (attestation objects and authenticator
//! data).
//!
//! The [`rand`] module hosts the random buffer generator used for challenges and user handles.

mod utils;

pub mod ctap2;
pub mod webauthn;

// Re-exports
pub use utils::{
    bytes::{Bytes, NotBase64Encoded},
    crypto, encoding, rand,
};
