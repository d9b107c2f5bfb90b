use std::sync::LazyLock;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::config::{
    GITHUB_AUTH_URL, GITHUB_CLIENT_ID, GITHUB_CLIENT_SECRET, GITHUB_EMAILS_API, GITHUB_TOKEN_URL,
    GITHUB_USER_API, OAUTH2_REDIRECT_URI,
};
use super::errors::OAuth2Error;
use super::types::{GithubEmail, GithubUser, OAuthProfile};

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default()
});

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

/// Build the provider authorization URL carrying the given state token
pub fn github_auth_url(state: &str) -> Result<String, OAuth2Error> {
    let mut url = Url::parse(&GITHUB_AUTH_URL)
        .map_err(|e| OAuth2Error::TokenExchange(format!("Malformed authorize URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &GITHUB_CLIENT_ID)
        .append_pair("redirect_uri", &OAUTH2_REDIRECT_URI)
        .append_pair("scope", "user:email")
        .append_pair("state", state);
    Ok(url.to_string())
}

/// Exchange an authorization code for a normalized profile.
///
/// The email list endpoint needs the `user:email` scope; if it fails for any
/// reason we degrade to the public profile email, marked unverified.
pub(crate) async fn exchange_github_code(code: &str) -> Result<OAuthProfile, OAuth2Error> {
    let token = exchange_code_for_token(code).await?;

    let raw = fetch_user(&token).await?;
    let github_user: GithubUser = serde_json::from_value(raw.clone())?;

    let emails = fetch_emails(&token).await.unwrap_or_default();
    let (email, email_verified) = select_email(github_user.email.clone(), emails);

    Ok(OAuthProfile {
        provider: "github".to_string(),
        provider_id: github_user.id.to_string(),
        email,
        email_verified,
        name: github_user.name.clone().or(Some(github_user.login.clone())),
        avatar_url: github_user.avatar_url.clone(),
        raw,
    })
}

async fn exchange_code_for_token(code: &str) -> Result<String, OAuth2Error> {
    let response = HTTP_CLIENT
        .post(GITHUB_TOKEN_URL.as_str())
        .header(reqwest::header::ACCEPT, "application/json")
        .form(&[
            ("client_id", GITHUB_CLIENT_ID.as_str()),
            ("client_secret", GITHUB_CLIENT_SECRET.as_str()),
            ("code", code),
            ("redirect_uri", OAUTH2_REDIRECT_URI.as_str()),
        ])
        .send()
        .await
        .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

    token.access_token.ok_or_else(|| {
        OAuth2Error::TokenExchange(
            token
                .error_description
                .unwrap_or_else(|| "No access token in response".to_string()),
        )
    })
}

async fn fetch_user(access_token: &str) -> Result<Value, OAuth2Error> {
    HTTP_CLIENT
        .get(GITHUB_USER_API.as_str())
        .bearer_auth(access_token)
        .header(reqwest::header::USER_AGENT, "session-identity")
        .send()
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?
        .json()
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))
}

async fn fetch_emails(access_token: &str) -> Result<Vec<GithubEmail>, OAuth2Error> {
    HTTP_CLIENT
        .get(GITHUB_EMAILS_API.as_str())
        .bearer_auth(access_token)
        .header(reqwest::header::USER_AGENT, "session-identity")
        .send()
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?
        .json()
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))
}

/// Pick the best email from the list endpoint, preferring the primary
/// verified address, then any verified one. The public profile email is the
/// last resort and always counts as unverified.
fn select_email(
    profile_email: Option<String>,
    emails: Vec<GithubEmail>,
) -> (Option<String>, bool) {
    if let Some(primary) = emails.iter().find(|e| e.primary && e.verified) {
        return (Some(primary.email.clone()), true);
    }
    if let Some(verified) = emails.iter().find(|e| e.verified) {
        return (Some(verified.email.clone()), true);
    }
    (profile_email, false)
}
