//! Per-client identity and authentication options.
//!
//! A [`ClientConfig`] is always replaced wholesale; there is no partial
//! merge. Header injection reads it through [`ClientConfig::headers`], which
//! is the single place where the field-to-header mapping lives.

use serde::{Deserialize, Serialize};

/// Header carrying the cloud credentials profile.
pub const PROFILE_HEADER: &str = "X-AWS-Profile";
/// Header carrying the cloud region.
pub const REGION_HEADER: &str = "X-AWS-Region";
/// Header carrying the daemon API key.
pub const API_KEY_HEADER: &str = "X-API-Key";
/// Header carrying a profile invitation token.
pub const INVITATION_TOKEN_HEADER: &str = "X-Invitation-Token";
/// Header carrying the owning cloud account of an invited profile.
pub const OWNER_ACCOUNT_HEADER: &str = "X-Owner-Account";
/// Header carrying the object-storage configuration path.
pub const STORAGE_CONFIG_PATH_HEADER: &str = "X-S3-Config-Path";

/// Identity and authentication options sent with every request.
///
/// Every field is optional; an empty string means "absent" and produces no
/// header at all.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Cloud credentials profile name.
    pub profile: String,
    /// Cloud region.
    pub region: String,
    /// Invitation token for a shared profile.
    pub invitation_token: String,
    /// Account that owns an invited profile.
    pub owner_account: String,
    /// Path of the object-storage configuration used by invited profiles.
    pub storage_config_path: String,
    /// Daemon API key.
    pub api_key: String,
}

impl ClientConfig {
    /// Sets the credentials profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the invitation token and the account that issued it.
    pub fn with_invitation(
        mut self,
        token: impl Into<String>,
        owner_account: impl Into<String>,
    ) -> Self {
        self.invitation_token = token.into();
        self.owner_account = owner_account.into();
        self
    }

    /// Sets the object-storage configuration path.
    pub fn with_storage_config_path(mut self, path: impl Into<String>) -> Self {
        self.storage_config_path = path.into();
        self
    }

    /// Returns one `(header name, value)` pair per non-empty field.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        [
            (PROFILE_HEADER, self.profile.as_str()),
            (REGION_HEADER, self.region.as_str()),
            (API_KEY_HEADER, self.api_key.as_str()),
            (INVITATION_TOKEN_HEADER, self.invitation_token.as_str()),
            (OWNER_ACCOUNT_HEADER, self.owner_account.as_str()),
            (STORAGE_CONFIG_PATH_HEADER, self.storage_config_path.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &str) -> &str {
            if value.is_empty() {
                ""
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("ClientConfig")
            .field("profile", &self.profile)
            .field("region", &self.region)
            .field("invitation_token", &redact(&self.invitation_token))
            .field("owner_account", &self.owner_account)
            .field("storage_config_path", &self.storage_config_path)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}
