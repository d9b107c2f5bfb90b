use chrono::{Duration, Utc};

use crate::storage::{CacheData, CacheStore, GENERIC_CACHE_STORE};
use crate::utils::gen_random_string;

use super::config::OAUTH2_STATE_TTL;
use super::errors::OAuth2Error;
use super::types::StoredState;

const STATE_PREFIX: &str = "oauth2_state";
const STATE_TOKEN_LEN: usize = 32;

/// Mint a state token for an anonymous login flow
pub async fn issue_login_state() -> Result<String, OAuth2Error> {
    issue_state(None).await
}

/// Mint a state token for an authenticated link flow. The user id rides in
/// the server-side record, never through the provider round-trip.
pub async fn issue_link_state(user_id: &str) -> Result<String, OAuth2Error> {
    issue_state(Some(user_id.to_string())).await
}

async fn issue_state(link_user_id: Option<String>) -> Result<String, OAuth2Error> {
    let state = gen_random_string(STATE_TOKEN_LEN)?;
    let ttl = *OAUTH2_STATE_TTL;

    let stored = StoredState {
        state: state.clone(),
        link_user_id,
        expires_at: Utc::now() + Duration::seconds(ttl as i64),
        ttl,
    };
    let value = CacheData {
        value: serde_json::to_string(&stored)?,
    };

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(STATE_PREFIX, &state, value, ttl as usize)
        .await?;

    Ok(state)
}

/// Redeem a state token, returning the link-target user id if the flow was
/// started by a logged-in user.
///
/// The record is removed before any validity check, so a token can never be
/// redeemed twice regardless of outcome.
pub(crate) async fn consume_state(state: &str) -> Result<Option<String>, OAuth2Error> {
    let mut store = GENERIC_CACHE_STORE.lock().await;
    let data = store.get(STATE_PREFIX, state).await?;
    store.remove(STATE_PREFIX, state).await?;
    drop(store);

    let Some(data) = data else {
        return Err(OAuth2Error::InvalidState);
    };

    let stored: StoredState = serde_json::from_str(&data.value)?;
    if stored.state != state || stored.expires_at < Utc::now() {
        return Err(OAuth2Error::InvalidState);
    }

    Ok(stored.link_user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;

    #[tokio::test]
    async fn test_login_state_is_single_use() {
        init_test_environment().await;

        let state = issue_login_state().await.unwrap();
        // 32 random bytes encode to 43 base64url characters
        assert_eq!(state.len(), 43);

        let link = consume_state(&state).await.unwrap();
        assert!(link.is_none());

        // Second redemption fails
        assert!(matches!(
            consume_state(&state).await,
            Err(OAuth2Error::InvalidState)
        ));
    }

    #[tokio::test]
    async fn test_link_state_carries_user_id() {
        init_test_environment().await;

        let state = issue_link_state("user-123").await.unwrap();
        let link = consume_state(&state).await.unwrap();
        assert_eq!(link.as_deref(), Some("user-123"));
    }

    #[tokio::test]
    async fn test_unknown_state_rejected() {
        init_test_environment().await;

        assert!(matches!(
            consume_state("never-issued").await,
            Err(OAuth2Error::InvalidState)
        ));
    }

    #[tokio::test]
    async fn test_expired_state_rejected_and_removed() {
        init_test_environment().await;

        // Plant a record whose embedded expiry is already in the past
        let state = gen_random_string(STATE_TOKEN_LEN).unwrap();
        let stored = StoredState {
            state: state.clone(),
            link_user_id: Some("user-456".to_string()),
            expires_at: Utc::now() - Duration::seconds(10),
            ttl: 300,
        };
        GENERIC_CACHE_STORE
            .lock()
            .await
            .put_with_ttl(
                STATE_PREFIX,
                &state,
                CacheData {
                    value: serde_json::to_string(&stored).unwrap(),
                },
                300,
            )
            .await
            .unwrap();

        assert!(matches!(
            consume_state(&state).await,
            Err(OAuth2Error::InvalidState)
        ));
        // Gone even though redemption failed
        let left = GENERIC_CACHE_STORE
            .lock()
            .await
            .get(STATE_PREFIX, &state)
            .await
            .unwrap();
        assert!(left.is_none());
    }
}
