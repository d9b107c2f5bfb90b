use thiserror::Error;

use crate::userdb::UserError;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, tampered or wrongly-signed token
    #[error("Invalid token: {0}")]
    Token(String),

    /// Signature is valid but the token is past its expiry
    #[error("Token expired")]
    Expired,

    /// Refresh token verified but was not the user's current one, or the
    /// user has no active refresh session
    #[error("Access denied")]
    AccessDenied,

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error(transparent)]
    User(#[from] UserError),
}
