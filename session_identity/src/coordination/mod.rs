mod auth;
mod errors;
mod identity;
mod oauth;
mod password;

pub use auth::{
    AuthSession, UserSummary, current_user_profile, login_user, logout_user, refresh_session,
    register_user,
};
pub use errors::CoordinationError;
pub use identity::{linked_providers, resolve_oauth_user};
pub use oauth::complete_oauth_callback;
