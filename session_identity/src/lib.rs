//! session-identity - Session and identity core for JWT-based web products
//!
//! This crate provides the authentication core behind a web product: password
//! and OAuth login, short-lived access tokens paired with rotating refresh
//! tokens, reconciliation of third-party identities with local accounts, and
//! a client-side single-flight refresh coordinator.

mod client;
mod config;
mod coordination;
mod oauth2;
mod storage;
mod token;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

// Re-export the main coordination components
pub use coordination::{
    AuthSession, CoordinationError, UserSummary, complete_oauth_callback, current_user_profile,
    linked_providers, login_user, logout_user, refresh_session, register_user, resolve_oauth_user,
};

// Re-export the route prefix
pub use config::AUTH_ROUTE_PREFIX;

pub use oauth2::{
    OAUTH2_STATE_TTL, OAuth2Error, OAuthProfile, github_auth_url, issue_link_state,
    issue_login_state,
};

pub use token::{
    Claims, JWT_REFRESH_TTL, TokenError, TokenPair, verify_access_token, verify_refresh_token,
};

pub use userdb::{Identity, User, UserError};

pub use client::{
    AuthHttpClient, ClientError, HttpRefreshTransport, RefreshCoordinator, RefreshTransport,
};

/// Initialize the session and identity core
///
/// Checks cache connectivity, connects the underlying stores and creates the
/// user and identity tables when they do not exist yet.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    userdb::init().await?;
    Ok(())
}
