//! Central configuration for the session-identity-axum crate

use std::sync::LazyLock;

/// Base URL of the frontend the OAuth callback redirects back to.
/// Default: "http://localhost:5173"
pub static FRONTEND_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string())
});

/// Name of the HttpOnly cookie carrying the refresh token.
/// Default: "refresh_token"
pub static REFRESH_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("REFRESH_COOKIE_NAME").unwrap_or_else(|_| "refresh_token".to_string())
});

/// Name of the short-lived cookie binding the OAuth flow to this browser.
/// Default: "oauth2_state"
pub static OAUTH2_STATE_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("OAUTH2_STATE_COOKIE_NAME").unwrap_or_else(|_| "oauth2_state".to_string())
});
