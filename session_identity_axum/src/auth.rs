use axum::{
    Json, RequestPartsExt,
    extract::FromRequestParts,
    response::IntoResponse,
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use http::{HeaderMap, StatusCode, request::Parts};
use serde::{Deserialize, Serialize};

use session_identity::{
    AUTH_ROUTE_PREFIX, AuthSession, JWT_REFRESH_TTL, UserSummary, current_user_profile,
    login_user, logout_user, refresh_session, register_user, verify_access_token,
};

use super::config::REFRESH_COOKIE_NAME;
use super::cookie::{header_clear_cookie, header_set_cookie};
use super::error::IntoResponseError;

/// Authenticated user information, available as an Axum extractor
///
/// Decodes and verifies the bearer access token; handlers taking this
/// parameter reject unauthenticated requests with 401.
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Unique user identifier
    pub id: String,
    /// Email the token was issued for
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Missing bearer token".to_string()))?;

        let claims = verify_access_token(bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string())
        })?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}

#[derive(Deserialize)]
pub(super) struct RegisterRequest {
    email: String,
    password: String,
    name: String,
}

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    email: String,
    password: String,
}

/// Login-shaped response body. The refresh token travels only in the
/// HttpOnly cookie, never in the body.
#[derive(Serialize)]
pub(super) struct SessionResponse {
    access_token: String,
    user: UserSummary,
}

pub(super) fn session_response(
    session: AuthSession,
) -> Result<(HeaderMap, Json<SessionResponse>), (StatusCode, String)> {
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        &REFRESH_COOKIE_NAME,
        &session.refresh_token,
        AUTH_ROUTE_PREFIX.as_str(),
        *JWT_REFRESH_TTL as i64,
    )?;
    Ok((
        headers,
        Json(SessionResponse {
            access_token: session.access_token,
            user: session.user,
        }),
    ))
}

pub(super) async fn register(
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = register_user(&body.email, &body.password, &body.name)
        .await
        .into_response_error()?;
    session_response(session)
}

pub(super) async fn login(
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = login_user(&body.email, &body.password)
        .await
        .into_response_error()?;
    session_response(session)
}

pub(super) async fn refresh(jar: CookieJar) -> Result<impl IntoResponse, (StatusCode, String)> {
    let refresh_token = jar
        .get(REFRESH_COOKIE_NAME.as_str())
        .map(|c| c.value().to_string())
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Missing refresh token".to_string()))?;

    let session = refresh_session(&refresh_token).await.into_response_error()?;
    session_response(session)
}

pub(super) async fn logout(user: AuthUser) -> Result<impl IntoResponse, (StatusCode, String)> {
    logout_user(&user.id).await.into_response_error()?;

    let mut headers = HeaderMap::new();
    header_clear_cookie(&mut headers, &REFRESH_COOKIE_NAME, AUTH_ROUTE_PREFIX.as_str())?;
    Ok((StatusCode::NO_CONTENT, headers))
}

pub(super) async fn me(user: AuthUser) -> Result<impl IntoResponse, (StatusCode, String)> {
    let profile = current_user_profile(&user.id).await.into_response_error()?;
    Ok(Json(profile))
}
