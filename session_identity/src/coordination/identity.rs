use crate::oauth2::OAuthProfile;
use crate::userdb::{Identity, IdentityStore, PLACEHOLDER_NAME, User, UserError, UserStore};

use super::auth::UserSummary;
use super::errors::CoordinationError;

/// Resolve an OAuth profile to a local user.
///
/// The ladder, first rung that matches wins:
/// 1. explicit link target from an authenticated link flow
/// 2. the identity is already known
/// 3. a provider-verified email matches an existing account
/// 4. a new account is created
///
/// An unverified email never reaches rung 3; impersonating an address at the
/// provider must not grant access to the local account that owns it.
pub async fn resolve_oauth_user(
    profile: &OAuthProfile,
    link_user_id: Option<&str>,
) -> Result<User, CoordinationError> {
    if let Some(user_id) = link_user_id {
        let user = UserStore::get_user(user_id).await?.ok_or_else(|| {
            CoordinationError::ResourceNotFound {
                resource_type: "User".to_string(),
                resource_id: user_id.to_string(),
            }
            .log()
        })?;
        link_identity(&user.id, profile).await?;
        tracing::info!(user_id = %user.id, provider = %profile.provider, "Linked identity");
        return Ok(user);
    }

    if let Some(identity) =
        IdentityStore::get_identity(&profile.provider, &profile.provider_id).await?
    {
        let user = UserStore::get_user(&identity.user_id).await?.ok_or_else(|| {
            CoordinationError::ResourceNotFound {
                resource_type: "User".to_string(),
                resource_id: identity.user_id.clone(),
            }
            .log()
        })?;
        return Ok(user);
    }

    if profile.email_verified
        && let Some(email) = &profile.email
        && let Some(user) = UserStore::get_user_by_email(email).await?
    {
        link_identity(&user.id, profile).await?;
        tracing::info!(user_id = %user.id, provider = %profile.provider, "Attached identity to existing account");
        return Ok(user);
    }

    let user = create_user_for_profile(profile).await?;
    link_identity(&user.id, profile).await?;
    tracing::info!(user_id = %user.id, provider = %profile.provider, "Created user from OAuth profile");
    Ok(user)
}

/// Bind an identity to a user. Re-linking the same pair to the same user is
/// a no-op; a pair owned by another user is a conflict.
pub(super) async fn link_identity(
    user_id: &str,
    profile: &OAuthProfile,
) -> Result<(), CoordinationError> {
    if let Some(existing) =
        IdentityStore::get_identity(&profile.provider, &profile.provider_id).await?
    {
        if existing.user_id == user_id {
            return Ok(());
        }
        return Err(CoordinationError::IdentityConflict.log());
    }

    IdentityStore::add_identity(Identity::new(
        user_id,
        &profile.provider,
        &profile.provider_id,
        profile.raw.clone(),
    ))
    .await?;
    Ok(())
}

/// Provider names linked to a user
pub async fn linked_providers(user_id: &str) -> Result<Vec<String>, CoordinationError> {
    Ok(IdentityStore::get_providers(user_id).await?)
}

/// Build the public profile view, filling a placeholder name or missing
/// avatar from linked identities' provider payloads.
pub(super) async fn profile_summary(user: &User) -> Result<UserSummary, CoordinationError> {
    let identities = IdentityStore::get_identities(&user.id).await?;

    let mut name = user.name.clone();
    if user.has_placeholder_name()
        && let Some(profile_name) = identities
            .iter()
            .find_map(|i| i.profile_data.get("name").and_then(|v| v.as_str()))
    {
        name = profile_name.to_string();
    }

    let avatar_url = user.avatar_url.clone().or_else(|| {
        identities.iter().find_map(|i| {
            i.profile_data
                .get("avatar_url")
                .and_then(|v| v.as_str())
                .map(String::from)
        })
    });

    Ok(UserSummary {
        id: user.id.clone(),
        email: user.email.clone(),
        name,
        avatar_url,
        linked_providers: identities.into_iter().map(|i| i.provider).collect(),
    })
}

fn placeholder_email(profile: &OAuthProfile) -> String {
    format!("{}@{}.invalid", profile.provider_id, profile.provider)
}

async fn create_user_for_profile(profile: &OAuthProfile) -> Result<User, CoordinationError> {
    let name = profile
        .name
        .clone()
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
    let email = profile
        .email
        .clone()
        .unwrap_or_else(|| placeholder_email(profile));

    let mut user = User::new(email, name.clone());
    user.avatar_url = profile.avatar_url.clone();

    match UserStore::create_user(user).await {
        Ok(user) => Ok(user),
        // An unverified email may already belong to someone else. That
        // account is off limits, so the new one gets a synthetic address.
        Err(UserError::EmailTaken) if !profile.email_verified => {
            let mut user = User::new(placeholder_email(profile), name);
            user.avatar_url = profile.avatar_url.clone();
            Ok(UserStore::create_user(user).await?)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;

    fn github_profile(provider_id: &str, email: Option<&str>, verified: bool) -> OAuthProfile {
        OAuthProfile {
            provider: "github".to_string(),
            provider_id: provider_id.to_string(),
            email: email.map(String::from),
            email_verified: verified,
            name: Some("Octo Cat".to_string()),
            avatar_url: Some("https://avatars.example.com/octo".to_string()),
            raw: serde_json::json!({
                "name": "Octo Cat",
                "avatar_url": "https://avatars.example.com/octo",
            }),
        }
    }

    fn unique_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn unique_email(tag: &str) -> String {
        format!("{}-{}@example.com", tag, uuid::Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_known_identity_returns_same_user() {
        init_test_environment().await;

        let profile = github_profile(&unique_id(), Some(&unique_email("known")), true);
        let first = resolve_oauth_user(&profile, None).await.unwrap();
        let second = resolve_oauth_user(&profile, None).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_verified_email_attaches_to_existing_account() {
        init_test_environment().await;

        let email = unique_email("attach");
        let existing = UserStore::create_user(User::new(email.clone(), "Existing"))
            .await
            .unwrap();

        let profile = github_profile(&unique_id(), Some(&email), true);
        let resolved = resolve_oauth_user(&profile, None).await.unwrap();
        assert_eq!(resolved.id, existing.id);

        let providers = linked_providers(&existing.id).await.unwrap();
        assert_eq!(providers, vec!["github".to_string()]);
    }

    #[tokio::test]
    async fn test_unverified_email_never_merges() {
        init_test_environment().await;

        let email = unique_email("nomerge");
        let existing = UserStore::create_user(User::new(email.clone(), "Existing"))
            .await
            .unwrap();

        let provider_id = unique_id();
        let profile = github_profile(&provider_id, Some(&email), false);
        let resolved = resolve_oauth_user(&profile, None).await.unwrap();

        // A distinct account with a synthetic address, not a merge
        assert_ne!(resolved.id, existing.id);
        assert_eq!(resolved.email, format!("{provider_id}@github.invalid"));
        assert!(linked_providers(&existing.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_without_email_gets_placeholder() {
        init_test_environment().await;

        let provider_id = unique_id();
        let profile = github_profile(&provider_id, None, false);
        let user = resolve_oauth_user(&profile, None).await.unwrap();
        assert_eq!(user.email, format!("{provider_id}@github.invalid"));
        assert_eq!(user.name, "Octo Cat");
        assert!(user.avatar_url.is_some());
    }

    #[tokio::test]
    async fn test_link_flow_is_idempotent_and_guards_ownership() {
        init_test_environment().await;

        let owner = UserStore::create_user(User::new(unique_email("owner"), "Owner"))
            .await
            .unwrap();
        let intruder = UserStore::create_user(User::new(unique_email("intruder"), "Intruder"))
            .await
            .unwrap();

        let profile = github_profile(&unique_id(), None, false);

        let linked = resolve_oauth_user(&profile, Some(&owner.id)).await.unwrap();
        assert_eq!(linked.id, owner.id);

        // Linking the same identity to the same user again is a no-op
        let relinked = resolve_oauth_user(&profile, Some(&owner.id)).await.unwrap();
        assert_eq!(relinked.id, owner.id);

        // Another account cannot claim it
        assert!(matches!(
            resolve_oauth_user(&profile, Some(&intruder.id)).await,
            Err(CoordinationError::IdentityConflict)
        ));
    }

    #[tokio::test]
    async fn test_link_target_must_exist() {
        init_test_environment().await;

        let profile = github_profile(&unique_id(), None, false);
        assert!(matches!(
            resolve_oauth_user(&profile, Some("no-such-user")).await,
            Err(CoordinationError::ResourceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_profile_summary_backfills_from_identity() {
        init_test_environment().await;

        // OAuth-created user whose provider payload carries name and avatar
        let provider_id = unique_id();
        let mut profile = github_profile(&provider_id, None, false);
        profile.name = None;
        profile.avatar_url = None;

        let user = resolve_oauth_user(&profile, None).await.unwrap();
        assert!(user.has_placeholder_name());

        let summary = profile_summary(&user).await.unwrap();
        assert_eq!(summary.name, "Octo Cat");
        assert_eq!(
            summary.avatar_url.as_deref(),
            Some("https://avatars.example.com/octo")
        );
        assert_eq!(summary.linked_providers, vec!["github".to_string()]);
    }
}
