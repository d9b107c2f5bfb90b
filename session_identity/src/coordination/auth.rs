use serde::Serialize;

use crate::token::{TokenPair, issue_token_pair, revoke_refresh_token, rotate_token_pair};
use crate::userdb::{User, UserStore};

use super::errors::CoordinationError;
use super::identity::profile_summary;
use super::password::{hash_password, verify_password};

/// Everything a login-shaped endpoint returns: both tokens plus the profile
/// the frontend renders.
#[derive(Clone, Debug, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Public view of a user, secrets stripped
#[derive(Clone, Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub linked_providers: Vec<String>,
}

/// Create a credential account and start a session
pub async fn register_user(
    email: &str,
    password: &str,
    name: &str,
) -> Result<AuthSession, CoordinationError> {
    let mut user = User::new(email, name);
    user.password_hash = Some(hash_password(password)?);
    let user = UserStore::create_user(user).await?;

    tracing::info!(user_id = %user.id, "Registered new user");
    issue_session(&user).await
}

/// Credential login. Unknown email, OAuth-only account and wrong password
/// all fail with the same `InvalidCredentials`.
pub async fn login_user(email: &str, password: &str) -> Result<AuthSession, CoordinationError> {
    let user = UserStore::get_user_by_email(email)
        .await?
        .ok_or_else(|| CoordinationError::InvalidCredentials.log())?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| CoordinationError::InvalidCredentials.log())?;

    if !verify_password(password, stored_hash) {
        return Err(CoordinationError::InvalidCredentials.log());
    }

    issue_session(&user).await
}

/// Rotate a refresh token into a fresh session
pub async fn refresh_session(refresh_token: &str) -> Result<AuthSession, CoordinationError> {
    let (user, pair) = rotate_token_pair(refresh_token).await?;
    session_from_pair(&user, pair).await
}

/// End the user's refresh session. Already-expired access tokens keep their
/// natural lifetime; only refreshing is cut off.
pub async fn logout_user(user_id: &str) -> Result<(), CoordinationError> {
    revoke_refresh_token(user_id).await?;
    tracing::info!(user_id = %user_id, "Logged out");
    Ok(())
}

/// Profile for an authenticated user
pub async fn current_user_profile(user_id: &str) -> Result<UserSummary, CoordinationError> {
    let user = UserStore::get_user(user_id).await?.ok_or_else(|| {
        CoordinationError::ResourceNotFound {
            resource_type: "User".to_string(),
            resource_id: user_id.to_string(),
        }
        .log()
    })?;
    profile_summary(&user).await
}

pub(super) async fn issue_session(user: &User) -> Result<AuthSession, CoordinationError> {
    let pair = issue_token_pair(user).await?;
    session_from_pair(user, pair).await
}

async fn session_from_pair(user: &User, pair: TokenPair) -> Result<AuthSession, CoordinationError> {
    let summary = profile_summary(user).await?;
    Ok(AuthSession {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: summary,
    })
}
