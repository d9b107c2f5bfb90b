use http::{HeaderMap, StatusCode, header::SET_COOKIE};

/// Append an HttpOnly session cookie scoped to `path`
pub(super) fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    path: &str,
    max_age: i64,
) -> Result<(), (StatusCode, String)> {
    let cookie =
        format!("{name}={value}; SameSite=Lax; Secure; HttpOnly; Path={path}; Max-Age={max_age}");
    headers.append(
        SET_COOKIE,
        cookie.parse().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build cookie header".to_string(),
            )
        })?,
    );
    Ok(())
}

/// Append a cookie removal for `name` at `path`
pub(super) fn header_clear_cookie(
    headers: &mut HeaderMap,
    name: &str,
    path: &str,
) -> Result<(), (StatusCode, String)> {
    header_set_cookie(headers, name, "", path, 0)
}
