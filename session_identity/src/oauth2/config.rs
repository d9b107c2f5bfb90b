use std::sync::LazyLock;

pub(super) static GITHUB_CLIENT_ID: LazyLock<String> =
    LazyLock::new(|| std::env::var("GITHUB_CLIENT_ID").expect("GITHUB_CLIENT_ID must be set"));

pub(super) static GITHUB_CLIENT_SECRET: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GITHUB_CLIENT_SECRET").expect("GITHUB_CLIENT_SECRET must be set")
});

/// Callback this service registered with the provider
pub(super) static OAUTH2_REDIRECT_URI: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OAUTH2_REDIRECT_URI").expect("OAUTH2_REDIRECT_URI must be set")
});

pub(super) static GITHUB_AUTH_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GITHUB_AUTH_URL")
        .unwrap_or_else(|_| "https://github.com/login/oauth/authorize".to_string())
});

pub(super) static GITHUB_TOKEN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GITHUB_TOKEN_URL")
        .unwrap_or_else(|_| "https://github.com/login/oauth/access_token".to_string())
});

pub(super) static GITHUB_USER_API: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GITHUB_USER_API").unwrap_or_else(|_| "https://api.github.com/user".to_string())
});

pub(super) static GITHUB_EMAILS_API: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GITHUB_EMAILS_API")
        .unwrap_or_else(|_| "https://api.github.com/user/emails".to_string())
});

/// How long an issued state token stays redeemable, in seconds
pub static OAUTH2_STATE_TTL: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("OAUTH2_STATE_TTL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(300)
});
