use serde::{Deserialize, Serialize};

/// The names and hints sent with every request.
///
/// Missing fields take their [`Default`] value when deserializing, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Human palatable name of the Relying Party.
    pub rp_name: String,

    /// RP ID to claim. When `None` the platform uses the origin's effective domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,

    /// Account identifier shown by the authenticator.
    pub user_name: String,

    /// Account display name shown by the authenticator.
    pub user_display_name: String,

    /// Timeout hint in milliseconds for both ceremonies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rp_name: "RP_NAME".into(),
            rp_id: None,
            user_name: "USER_NAME".into(),
            user_display_name: "USER_DISPLAY_NAME".into(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Set the Relying Party name.
    pub fn rp_name(mut self, name: impl Into<String>) -> Self {
        self.rp_name = name.into();
        self
    }

    /// Claim a specific RP ID instead of the origin's effective domain.
    pub fn rp_id(mut self, id: impl Into<String>) -> Self {
        self.rp_id = Some(id.into());
        self
    }

    /// Set both the user name and display name.
    pub fn user(mut self, name: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self.user_display_name = display_name.into();
        self
    }

    /// Set the timeout hint, in milliseconds.
    pub fn timeout(mut self, millis: u32) -> Self {
        self.timeout = Some(millis);
        self
    }
}
