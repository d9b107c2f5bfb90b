use crate::userdb::{User, UserStore};

use super::errors::TokenError;
use super::fingerprint::{fingerprint_matches, refresh_token_fingerprint};
use super::issuer::{issue_token_pair, verify_refresh_token};
use super::types::TokenPair;

/// Exchange a refresh token for a new pair, invalidating the presented token.
///
/// Only the user's current refresh token rotates; a verified-but-superseded
/// token is refused the same way as one for a revoked session, so a caller
/// cannot distinguish the two cases.
pub(crate) async fn rotate_token_pair(refresh_token: &str) -> Result<(User, TokenPair), TokenError> {
    let claims = verify_refresh_token(refresh_token)?;

    let user = UserStore::get_user(&claims.sub)
        .await?
        .ok_or(TokenError::AccessDenied)?;

    let stored = user
        .refresh_fingerprint
        .as_deref()
        .ok_or(TokenError::AccessDenied)?;

    let candidate = refresh_token_fingerprint(refresh_token)?;
    if !fingerprint_matches(stored, &candidate) {
        return Err(TokenError::AccessDenied);
    }

    let pair = issue_token_pair(&user).await?;
    Ok((user, pair))
}

/// Clear the stored fingerprint so no outstanding refresh token can rotate
pub(crate) async fn revoke_refresh_token(user_id: &str) -> Result<(), TokenError> {
    UserStore::set_refresh_fingerprint(user_id, None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;

    async fn user_with_session(tag: &str) -> (User, TokenPair) {
        let user = UserStore::create_user(User::new(
            format!("{}-{}@example.com", tag, uuid::Uuid::new_v4()),
            "Rotator Test",
        ))
        .await
        .unwrap();
        let pair = issue_token_pair(&user).await.unwrap();
        (user, pair)
    }

    #[tokio::test]
    async fn test_rotation_supersedes_previous_token() {
        init_test_environment().await;
        let (user, first) = user_with_session("rotate").await;

        let (rotated_user, second) = rotate_token_pair(&first.refresh_token).await.unwrap();
        assert_eq!(rotated_user.id, user.id);
        assert_ne!(first.refresh_token, second.refresh_token);

        // The superseded token still carries a valid signature but no longer
        // matches the stored fingerprint
        assert!(verify_refresh_token(&first.refresh_token).is_ok());
        assert!(matches!(
            rotate_token_pair(&first.refresh_token).await,
            Err(TokenError::AccessDenied)
        ));

        // The current token keeps rotating
        assert!(rotate_token_pair(&second.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoked_session_refuses_rotation() {
        init_test_environment().await;
        let (user, pair) = user_with_session("revoke").await;

        revoke_refresh_token(&user.id).await.unwrap();

        assert!(matches!(
            rotate_token_pair(&pair.refresh_token).await,
            Err(TokenError::AccessDenied)
        ));

        let stored = UserStore::get_user(&user.id).await.unwrap().unwrap();
        assert!(stored.refresh_fingerprint.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_refused() {
        init_test_environment().await;

        // A signed token for a user that was never stored
        let ghost = User::new(
            format!("ghost-{}@example.com", uuid::Uuid::new_v4()),
            "Ghost",
        );
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = crate::token::Claims {
            sub: ghost.id.clone(),
            email: ghost.email.clone(),
            iat: now,
            exp: now + 600,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(
                std::env::var("JWT_REFRESH_SECRET").unwrap().as_bytes(),
            ),
        )
        .unwrap();

        assert!(matches!(
            rotate_token_pair(&token).await,
            Err(TokenError::AccessDenied)
        ));
    }
}
