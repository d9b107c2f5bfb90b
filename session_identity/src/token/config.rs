use std::sync::LazyLock;

/// Signing secret for short-lived access tokens
pub(super) static JWT_ACCESS_SECRET: LazyLock<String> = LazyLock::new(|| {
    std::env::var("JWT_ACCESS_SECRET").expect("JWT_ACCESS_SECRET must be set")
});

/// Signing secret for refresh tokens, distinct from the access secret so a
/// leaked access token can never be replayed as a refresh token
pub(super) static JWT_REFRESH_SECRET: LazyLock<String> = LazyLock::new(|| {
    std::env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET must be set")
});

/// Key for the HMAC fingerprint stored server-side per user
pub(super) static REFRESH_FINGERPRINT_SECRET: LazyLock<String> = LazyLock::new(|| {
    std::env::var("REFRESH_FINGERPRINT_SECRET").expect("REFRESH_FINGERPRINT_SECRET must be set")
});

/// Access token lifetime in seconds (default 15 minutes)
pub(super) static JWT_ACCESS_TTL: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("JWT_ACCESS_TTL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(900)
});

/// Refresh token lifetime in seconds (default 7 days). Public because the
/// HTTP layer reuses it as the refresh cookie Max-Age.
pub static JWT_REFRESH_TTL: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("JWT_REFRESH_TTL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(604_800)
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::load_test_env;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_ttl_defaults() {
        load_test_env();
        unsafe {
            std::env::remove_var("JWT_ACCESS_TTL");
            std::env::remove_var("JWT_REFRESH_TTL");
        }
        // Statics may already be initialized by another test; assert the
        // parsed values are at least sane relative to each other.
        assert!(*JWT_ACCESS_TTL < *JWT_REFRESH_TTL);
    }

    #[test]
    #[serial]
    fn test_secrets_are_distinct() {
        load_test_env();
        assert_ne!(*JWT_ACCESS_SECRET, *JWT_REFRESH_SECRET);
    }
}
