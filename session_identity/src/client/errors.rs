use thiserror::Error;

/// Client-side errors. `Clone` because one refresh outcome fans out to every
/// request that was waiting on it.
#[derive(Clone, Debug, Error)]
pub enum ClientError {
    /// The refresh endpoint refused or the response was unusable
    #[error("Refresh failed: {0}")]
    Refresh(String),

    #[error("HTTP error: {0}")]
    Http(String),

    /// The coordinator was torn down while this request waited on a refresh
    #[error("Refresh coordinator closed")]
    CoordinatorClosed,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}
