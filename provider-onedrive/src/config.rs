//! Connector configuration

/// Default Microsoft Graph API base
pub const DEFAULT_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Where a user can revoke app access by hand; the Graph API has no
/// programmatic token-revocation endpoint.
pub const MANUAL_REVOKE_URL: &str = "https://account.live.com/consent/Manage";

/// OneDrive connector configuration.
///
/// The defaults talk to the worldwide Graph endpoint; the API base can be
/// overridden for sovereign-cloud deployments or tests.
#[derive(Debug, Clone)]
pub struct OneDriveConfig {
    /// Graph API base URL, without a trailing slash
    pub api_base: String,

    /// URL surfaced by `logout()` for manual revocation
    pub manual_revoke_url: String,
}

impl Default for OneDriveConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            manual_revoke_url: MANUAL_REVOKE_URL.to_string(),
        }
    }
}

impl OneDriveConfig {
    /// Override the Graph API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let base = api_base.into();
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }
}
