use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::userdb::{User, UserStore};

use super::config::{JWT_ACCESS_SECRET, JWT_ACCESS_TTL, JWT_REFRESH_SECRET, JWT_REFRESH_TTL};
use super::errors::TokenError;
use super::fingerprint::refresh_token_fingerprint;
use super::types::{Claims, TokenPair};

/// Sign a fresh access/refresh pair for a user and persist the refresh
/// fingerprint, atomically replacing any previous refresh session.
pub(crate) async fn issue_token_pair(user: &User) -> Result<TokenPair, TokenError> {
    let access_token = sign_token(user, &JWT_ACCESS_SECRET, *JWT_ACCESS_TTL)?;
    let refresh_token = sign_token(user, &JWT_REFRESH_SECRET, *JWT_REFRESH_TTL)?;

    let fingerprint = refresh_token_fingerprint(&refresh_token)?;
    UserStore::set_refresh_fingerprint(&user.id, Some(&fingerprint)).await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn sign_token(user: &User, secret: &str, ttl: u64) -> Result<String, TokenError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: now,
        exp: now + ttl as usize,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Token(e.to_string()))
}

/// Decode and validate an access token
pub fn verify_access_token(token: &str) -> Result<Claims, TokenError> {
    verify_token(token, &JWT_ACCESS_SECRET)
}

/// Decode and validate a refresh token's signature and expiry. Whether it is
/// the user's current refresh token is a separate, stateful check.
pub fn verify_refresh_token(token: &str) -> Result<Claims, TokenError> {
    verify_token(token, &JWT_REFRESH_SECRET)
}

fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Token(e.to_string()),
    })
}
