use axum::{
    extract::Query,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use session_identity::{
    AUTH_ROUTE_PREFIX, CoordinationError, JWT_REFRESH_TTL, OAUTH2_STATE_TTL,
    complete_oauth_callback, github_auth_url, issue_link_state, issue_login_state,
};

use super::auth::AuthUser;
use super::config::{FRONTEND_URL, OAUTH2_STATE_COOKIE_NAME, REFRESH_COOKIE_NAME};
use super::cookie::{header_clear_cookie, header_set_cookie};

#[derive(Deserialize)]
pub(super) struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Start an anonymous GitHub login flow
pub(super) async fn github() -> Result<impl IntoResponse, (StatusCode, String)> {
    let state = issue_login_state()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    start_flow(&state)
}

/// Start a link flow for the already-authenticated user
pub(super) async fn github_link(user: AuthUser) -> Result<impl IntoResponse, (StatusCode, String)> {
    let state = issue_link_state(&user.id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    start_flow(&state)
}

/// Redirect to the provider, with a state cookie binding the flow to this
/// browser for the callback comparison.
fn start_flow(state: &str) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let auth_url =
        github_auth_url(state).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &OAUTH2_STATE_COOKIE_NAME,
        state,
        "/",
        *OAUTH2_STATE_TTL as i64,
    )?;
    Ok((headers, Redirect::temporary(&auth_url)))
}

/// Provider callback. Every outcome redirects back to the frontend; failures
/// carry a stable error code the login page can render.
pub(super) async fn github_callback(
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut headers = HeaderMap::new();
    header_clear_cookie(&mut headers, &OAUTH2_STATE_COOKIE_NAME, "/")?;

    // The state in the query must be the one this browser was handed when
    // the flow started
    let cookie_state = jar
        .get(OAUTH2_STATE_COOKIE_NAME.as_str())
        .map(|c| c.value().to_string());
    let browser_bound = match (&query.state, &cookie_state) {
        (Some(state), Some(cookie)) => state.as_bytes().ct_eq(cookie.as_bytes()).into(),
        _ => false,
    };
    if !browser_bound && query.error.is_none() {
        tracing::warn!("OAuth callback state does not match browser cookie");
        return Ok((headers, login_error_redirect("auth_failed")));
    }

    match complete_oauth_callback(
        query.code.as_deref(),
        query.state.as_deref(),
        query.error.as_deref(),
    )
    .await
    {
        Ok(session) => {
            header_set_cookie(
                &mut headers,
                &REFRESH_COOKIE_NAME,
                &session.refresh_token,
                AUTH_ROUTE_PREFIX.as_str(),
                *JWT_REFRESH_TTL as i64,
            )?;
            let url = format!("{}/dashboard?login_success=true", *FRONTEND_URL);
            Ok((headers, Redirect::temporary(&url)))
        }
        Err(err) => {
            tracing::warn!(error = %err, "OAuth callback failed");
            let code = match err {
                CoordinationError::AuthCancelled => "auth_cancelled",
                CoordinationError::IdentityConflict => "identity_conflict",
                _ => "auth_failed",
            };
            Ok((headers, login_error_redirect(code)))
        }
    }
}

fn login_error_redirect(code: &str) -> Redirect {
    Redirect::temporary(&login_error_url(code))
}

fn login_error_url(code: &str) -> String {
    format!("{}/login?error={}", *FRONTEND_URL, urlencoding::encode(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_url_encodes_code() {
        // FRONTEND_URL defaults when unset
        let url = login_error_url("identity_conflict");
        assert!(url.ends_with("/login?error=identity_conflict"));

        let url = login_error_url("weird code&x");
        assert!(url.contains("error=weird%20code%26x"));
    }
}
