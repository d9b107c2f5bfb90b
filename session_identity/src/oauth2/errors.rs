use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error)]
pub enum OAuth2Error {
    /// The provider refused or garbled the code-for-token exchange
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to fetch user info: {0}")]
    FetchUserInfo(String),

    /// Missing, already-consumed or expired state token
    #[error("Invalid or expired state")]
    InvalidState,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<StorageError> for OAuth2Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Storage(msg) => OAuth2Error::Storage(msg),
            StorageError::Serde(msg) => OAuth2Error::Serde(msg),
        }
    }
}

impl From<UtilError> for OAuth2Error {
    fn from(err: UtilError) -> Self {
        OAuth2Error::Crypto(err.to_string())
    }
}

impl From<serde_json::Error> for OAuth2Error {
    fn from(err: serde_json::Error) -> Self {
        OAuth2Error::Serde(err.to_string())
    }
}
