use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::token::TokenError;
use crate::userdb::UserError;
use crate::utils::UtilError;

#[derive(Debug, Error)]
pub enum CoordinationError {
    /// Unknown email, missing password, or wrong password. Deliberately one
    /// variant so callers cannot probe which accounts exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Valid-looking request refused: revoked session, superseded refresh
    /// token, or expired token
    #[error("Access denied")]
    AccessDenied,

    #[error("Email already registered")]
    EmailTaken,

    /// The provider identity is already linked to a different account
    #[error("Identity already linked to another account")]
    IdentityConflict,

    /// The user cancelled or the provider denied authorization
    #[error("Authorization cancelled")]
    AuthCancelled,

    #[error("Invalid or expired state")]
    InvalidState,

    #[error("{resource_type} not found: {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    #[error(transparent)]
    User(UserError),

    #[error(transparent)]
    Token(TokenError),

    #[error(transparent)]
    OAuth2(OAuth2Error),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl CoordinationError {
    /// Log the error at debug level and return it, for use at the point an
    /// error is constructed.
    pub(crate) fn log(self) -> Self {
        tracing::debug!("Error: {:#?}", self);
        self
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken => Self::EmailTaken,
            UserError::IdentityTaken => Self::IdentityConflict,
            other => Self::User(other),
        }
        .log()
    }
}

impl From<TokenError> for CoordinationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::AccessDenied | TokenError::Expired => Self::AccessDenied,
            other => Self::Token(other),
        }
        .log()
    }
}

impl From<OAuth2Error> for CoordinationError {
    fn from(err: OAuth2Error) -> Self {
        match err {
            OAuth2Error::InvalidState => Self::InvalidState,
            other => Self::OAuth2(other),
        }
        .log()
    }
}

impl From<UtilError> for CoordinationError {
    fn from(err: UtilError) -> Self {
        Self::Crypto(err.to_string()).log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_conflicts_map_to_domain_variants() {
        assert!(matches!(
            CoordinationError::from(UserError::EmailTaken),
            CoordinationError::EmailTaken
        ));
        assert!(matches!(
            CoordinationError::from(UserError::IdentityTaken),
            CoordinationError::IdentityConflict
        ));
        assert!(matches!(
            CoordinationError::from(UserError::Storage("db down".to_string())),
            CoordinationError::User(_)
        ));
    }

    #[test]
    fn test_token_refusals_collapse_to_access_denied() {
        assert!(matches!(
            CoordinationError::from(TokenError::AccessDenied),
            CoordinationError::AccessDenied
        ));
        assert!(matches!(
            CoordinationError::from(TokenError::Expired),
            CoordinationError::AccessDenied
        ));
        assert!(matches!(
            CoordinationError::from(TokenError::Token("bad".to_string())),
            CoordinationError::Token(_)
        ));
    }

    #[test]
    fn test_invalid_state_maps_through() {
        assert!(matches!(
            CoordinationError::from(OAuth2Error::InvalidState),
            CoordinationError::InvalidState
        ));
    }
}
