mod config;
mod errors;
mod fingerprint;
mod issuer;
mod rotator;
mod types;

pub use config::JWT_REFRESH_TTL;
pub use errors::TokenError;
pub use issuer::{verify_access_token, verify_refresh_token};
pub use types::{Claims, TokenPair};

pub(crate) use issuer::issue_token_pair;
pub(crate) use rotator::{revoke_refresh_token, rotate_token_pair};
