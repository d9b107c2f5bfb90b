//! Axum integration for the session-identity authentication core
//!
//! Mounts password login, token refresh, logout, profile and the GitHub
//! OAuth flows as a single router, with the refresh token confined to an
//! HttpOnly cookie.

mod auth;
mod config;
mod cookie;
mod error;
mod oauth2;
mod router;

pub use auth::AuthUser;
pub use config::{FRONTEND_URL, OAUTH2_STATE_COOKIE_NAME, REFRESH_COOKIE_NAME};
pub use error::IntoResponseError;
pub use router::{auth_router, auth_router_no_trace};

// Re-export the route prefix and initialization function from the core crate
pub use session_identity::{AUTH_ROUTE_PREFIX, init};
