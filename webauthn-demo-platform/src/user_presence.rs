#[cfg(doc)]
use crate::SoftwarePlatform;

/// What the user is asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Save a new credential for `user_name` at `rp_id`.
    Register {
        /// The RP ID the credential will be scoped to.
        rp_id: String,
        /// The account name from the request.
        user_name: String,
    },
    /// Sign in to `rp_id` with one of `available` credentials.
    Authenticate {
        /// The RP ID of the request.
        rp_id: String,
        /// How many credentials are stored for the RP.
        available: usize,
    },
}

/// Pluggable trait for the [`SoftwarePlatform`] to ask for the user's consent.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
#[async_trait::async_trait]
pub trait UserPresence {
    /// Show `prompt` and wait for the user. `false` means the user cancelled.
    async fn confirm(&self, prompt: Prompt) -> bool;
}

/// A fixed answer, for unattended demos and tests.
#[async_trait::async_trait]
impl UserPresence for bool {
    async fn confirm(&self, prompt: Prompt) -> bool {
        log::debug!("answering {prompt:?} with {}", *self);
        *self
    }
}
