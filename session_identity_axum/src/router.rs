//! Combined router for all authentication endpoints

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Create the authentication router, to be nested at `AUTH_ROUTE_PREFIX`:
///
/// ```no_run
/// use axum::Router;
/// use session_identity_axum::{AUTH_ROUTE_PREFIX, auth_router};
///
/// let app: Router = Router::new().nest(AUTH_ROUTE_PREFIX.as_str(), auth_router());
/// ```
pub fn auth_router() -> Router {
    auth_router_no_trace().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`auth_router`] but without the HTTP tracing middleware, for
/// applications that bring their own.
pub fn auth_router_no_trace() -> Router {
    Router::new()
        .route("/register", post(super::auth::register))
        .route("/login", post(super::auth::login))
        .route("/refresh", post(super::auth::refresh))
        .route("/logout", post(super::auth::logout))
        .route("/me", get(super::auth::me))
        .route("/github", get(super::oauth2::github))
        .route("/github/link", get(super::oauth2::github_link))
        .route("/github/callback", get(super::oauth2::github_callback))
}
