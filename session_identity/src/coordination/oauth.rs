use crate::oauth2::{consume_state, exchange_github_code};

use super::auth::{AuthSession, issue_session};
use super::errors::CoordinationError;
use super::identity::resolve_oauth_user;

/// Drive the provider callback end to end: burn the state token, exchange
/// the code, resolve the user and start a session.
///
/// The state token is consumed on every path, including provider-reported
/// errors, so nothing redeemable survives a failed flow.
pub async fn complete_oauth_callback(
    code: Option<&str>,
    state: Option<&str>,
    error: Option<&str>,
) -> Result<AuthSession, CoordinationError> {
    if error.is_some() {
        if let Some(state) = state {
            let _ = consume_state(state).await;
        }
        return Err(CoordinationError::AuthCancelled.log());
    }

    let state = state.ok_or_else(|| CoordinationError::InvalidState.log())?;
    let link_user_id = consume_state(state).await?;

    let code = code.ok_or_else(|| CoordinationError::InvalidState.log())?;
    let profile = exchange_github_code(code).await?;

    let user = resolve_oauth_user(&profile, link_user_id.as_deref()).await?;
    issue_session(&user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth2::issue_login_state;
    use crate::test_utils::init_test_environment;

    #[tokio::test]
    async fn test_provider_error_cancels_and_burns_state() {
        init_test_environment().await;

        let state = issue_login_state().await.unwrap();
        let result = complete_oauth_callback(None, Some(&state), Some("access_denied")).await;
        assert!(matches!(result, Err(CoordinationError::AuthCancelled)));

        // The state died with the cancelled flow
        assert!(matches!(
            consume_state(&state).await,
            Err(crate::oauth2::OAuth2Error::InvalidState)
        ));
    }

    #[tokio::test]
    async fn test_missing_state_rejected() {
        init_test_environment().await;

        assert!(matches!(
            complete_oauth_callback(Some("some-code"), None, None).await,
            Err(CoordinationError::InvalidState)
        ));
    }

    #[tokio::test]
    async fn test_forged_state_rejected() {
        init_test_environment().await;

        assert!(matches!(
            complete_oauth_callback(Some("some-code"), Some("forged-state"), None).await,
            Err(CoordinationError::InvalidState)
        ));
    }

    #[tokio::test]
    async fn test_missing_code_with_valid_state_rejected() {
        init_test_environment().await;

        let state = issue_login_state().await.unwrap();
        assert!(matches!(
            complete_oauth_callback(None, Some(&state), None).await,
            Err(CoordinationError::InvalidState)
        ));
        // Consumed regardless
        assert!(matches!(
            consume_state(&state).await,
            Err(crate::oauth2::OAuth2Error::InvalidState)
        ));
    }
}
