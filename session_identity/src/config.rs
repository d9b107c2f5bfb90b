//! Central configuration for the session-identity crate

use std::sync::LazyLock;

/// Route prefix for all session-identity endpoints
///
/// This is the main prefix under which all authentication endpoints will be
/// mounted. The refresh cookie is scoped to it.
/// Default: "/auth"
pub static AUTH_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("AUTH_ROUTE_PREFIX").unwrap_or_else(|_| "/auth".to_string()));

#[cfg(test)]
mod tests {
    use std::env;

    #[test]
    fn test_auth_route_prefix_default() {
        // The LazyLock may already be initialized, so test the same logic it uses
        let original_value = env::var("AUTH_ROUTE_PREFIX").ok();

        unsafe {
            env::remove_var("AUTH_ROUTE_PREFIX");
        }

        let prefix = env::var("AUTH_ROUTE_PREFIX").unwrap_or_else(|_| "/auth".to_string());
        assert_eq!(prefix, "/auth");

        if let Some(value) = original_value {
            unsafe {
                env::set_var("AUTH_ROUTE_PREFIX", value);
            }
        }
    }

    #[test]
    fn test_auth_route_prefix_custom() {
        let original_value = env::var("AUTH_ROUTE_PREFIX").ok();

        unsafe {
            env::set_var("AUTH_ROUTE_PREFIX", "/api/auth");
        }

        let prefix = env::var("AUTH_ROUTE_PREFIX").unwrap_or_else(|_| "/auth".to_string());
        assert_eq!(prefix, "/api/auth");

        unsafe {
            match original_value {
                Some(value) => env::set_var("AUTH_ROUTE_PREFIX", value),
                None => env::remove_var("AUTH_ROUTE_PREFIX"),
            }
        }
    }
}
