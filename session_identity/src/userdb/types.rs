use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Placeholder display name for users created from a provider profile that
/// carried no usable name.
pub(crate) const PLACEHOLDER_NAME: &str = "OAuth User";

/// Represents a core user identity in the system
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Unique email address, lower-cased on the way in
    pub email: String,
    /// Argon2 hash of the password; None for pure-OAuth accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Display name
    pub name: String,
    /// Avatar image URL, if any
    pub avatar_url: Option<String>,
    /// One-way fingerprint of the currently valid refresh token;
    /// None means no active refresh session
    #[serde(skip_serializing)]
    pub refresh_fingerprint: Option<String>,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and a normalized email
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: normalize_email(&email.into()),
            password_hash: None,
            name: name.into(),
            avatar_url: None,
            refresh_fingerprint: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the display name still needs a real value
    pub(crate) fn has_placeholder_name(&self) -> bool {
        self.name.is_empty() || self.name == PLACEHOLDER_NAME
    }
}

/// Normalize an email address for storage and lookup
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A third-party credential bound to a User
///
/// `(provider, provider_id)` is globally unique: one external identity maps
/// to at most one User. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Identity {
    /// Owning user id
    pub user_id: String,
    /// Provider name, e.g. "github"
    pub provider: String,
    /// Provider-scoped subject id
    pub provider_id: String,
    /// Opaque snapshot of the provider's profile payload
    pub profile_data: serde_json::Value,
    /// When the identity was linked
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(
        user_id: impl Into<String>,
        provider: impl Into<String>,
        provider_id: impl Into<String>,
        profile_data: serde_json::Value,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            provider: provider.into(),
            provider_id: provider_id.into(),
            profile_data,
            created_at: Utc::now(),
        }
    }
}
