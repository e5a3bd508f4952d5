use p256::ecdsa::SigningKey;
use webauthn_demo_types::Bytes;

/// A discoverable credential held by the platform.
#[derive(Clone)]
pub(crate) struct StoredCredential {
    pub credential_id: Bytes,
    pub rp_id: String,
    pub user_handle: Bytes,
    pub private_key: SigningKey,
    pub counter: u32,
}

/// Credentials in insertion order, so the most recent registration comes last.
#[derive(Default)]
pub(crate) struct MemoryStore {
    credentials: Vec<StoredCredential>,
}

impl MemoryStore {
    pub fn save(&mut self, credential: StoredCredential) {
        // a new registration for the same account replaces the old one
        self.credentials.retain(|c| {
            !(c.rp_id == credential.rp_id && c.user_handle == credential.user_handle)
        });
        self.credentials.push(credential);
    }

    pub fn count_for(&self, rp_id: &str) -> usize {
        self.credentials.iter().filter(|c| c.rp_id == rp_id).count()
    }

    /// The most recently registered credential for `rp_id`.
    pub fn latest_for_mut(&mut self, rp_id: &str) -> Option<&mut StoredCredential> {
        self.credentials.iter_mut().rev().find(|c| c.rp_id == rp_id)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }
}
