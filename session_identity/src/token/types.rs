use serde::{Deserialize, Serialize};

/// JWT payload shared by access and refresh tokens
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Issued-at, seconds since epoch
    pub iat: usize,
    /// Expiry, seconds since epoch
    pub exp: usize,
    /// Unique token id. Timestamps are second-granular, so without this two
    /// tokens minted in the same second would be byte-identical and rotation
    /// could not distinguish old from new.
    pub jti: String,
}

/// A freshly signed access/refresh token pair
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
