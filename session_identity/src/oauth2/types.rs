use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-agnostic profile produced by the callback flow
#[derive(Clone, Debug)]
pub struct OAuthProfile {
    pub provider: String,
    /// The provider's stable subject id, stringified
    pub provider_id: String,
    pub email: Option<String>,
    /// Whether the provider attests the email as verified. Unverified emails
    /// never merge into an existing local account.
    pub email_verified: bool,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    /// Raw provider payload, persisted alongside the identity
    pub raw: Value,
}

/// Subset of the GitHub `/user` response we care about
#[derive(Debug, Deserialize)]
pub(super) struct GithubUser {
    pub(super) id: u64,
    pub(super) login: String,
    pub(super) name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) avatar_url: Option<String>,
}

/// Entry in the GitHub `/user/emails` response
#[derive(Debug, Deserialize)]
pub(super) struct GithubEmail {
    pub(super) email: String,
    pub(super) primary: bool,
    pub(super) verified: bool,
}

/// Server-side record behind a state token, read once at callback time
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct StoredState {
    pub(super) state: String,
    /// Set when the flow was started by a logged-in user linking a provider
    pub(super) link_user_id: Option<String>,
    pub(super) expires_at: DateTime<Utc>,
    pub(super) ttl: u64,
}
