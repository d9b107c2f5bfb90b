mod config;
mod errors;
mod github;
mod state;
mod types;

pub use config::OAUTH2_STATE_TTL;
pub use errors::OAuth2Error;
pub use github::github_auth_url;
pub use state::{issue_link_state, issue_login_state};
pub use types::OAuthProfile;

pub(crate) use github::exchange_github_code;
pub(crate) use state::consume_state;
