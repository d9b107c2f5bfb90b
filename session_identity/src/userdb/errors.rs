use thiserror::Error;

/// Errors from the user and identity stores
#[derive(Debug, Error, Clone)]
pub enum UserError {
    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// A user with this email already exists
    #[error("Email already registered")]
    EmailTaken,

    /// This (provider, provider_id) pair is already linked to a user
    #[error("Identity already linked")]
    IdentityTaken,
}
