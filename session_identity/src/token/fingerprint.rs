use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::utils::base64url_encode;

use super::config::REFRESH_FINGERPRINT_SECRET;
use super::errors::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Keyed digest of a refresh token, suitable for storage. The raw token is
/// never persisted; possession of the fingerprint alone cannot be replayed
/// as a token.
pub(super) fn refresh_token_fingerprint(refresh_token: &str) -> Result<String, TokenError> {
    let mut mac = HmacSha256::new_from_slice(REFRESH_FINGERPRINT_SECRET.as_bytes())
        .map_err(|e| TokenError::Crypto(e.to_string()))?;
    mac.update(refresh_token.as_bytes());
    let digest = mac.finalize().into_bytes();
    base64url_encode(digest.to_vec()).map_err(|e| TokenError::Crypto(e.to_string()))
}

/// Constant-time comparison of a stored fingerprint against a candidate
pub(super) fn fingerprint_matches(stored: &str, candidate: &str) -> bool {
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}
