use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::OffsetDateTime;

/// Name of the gate cookie. Only its presence matters; the value is never
/// inspected.
pub const AUTH_COOKIE: &str = "auth";

/// Access-gate middleware for the dashboard route.
///
/// Lets the request through unchanged when the gate cookie is present (any
/// value, including empty) and redirects to the landing page otherwise. This
/// is not a security boundary: nothing validates the cookie, there is no
/// server-side session, and any real authorization requirement would need a
/// server-verified session or token instead.
pub async fn require_auth(jar: CookieJar, request: Request, next: Next) -> Response {
    if jar.get(AUTH_COOKIE).is_some() {
        return next.run(request).await;
    }

    Redirect::to("/").into_response()
}

/// Handle entering the dashboard from the landing page
///
/// Sets the gate cookie and redirects to the dashboard.
///
/// # Arguments
/// * `jar` - Cookie jar to store the gate cookie in
///
/// # Returns
/// * `(CookieJar, Redirect)` - Modified cookie jar and redirect response
pub async fn handle_enter(jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((AUTH_COOKIE, "1")).path("/").build();

    (jar.add(cookie), Redirect::to("/dashboard"))
}

/// Handle logout
///
/// Clears the gate cookie by re-setting it with an already-expired timestamp
/// and redirects to the landing page. There is no server-side state to
/// invalidate.
///
/// # Arguments
/// * `jar` - Cookie jar containing the gate cookie
///
/// # Returns
/// * `(CookieJar, Redirect)` - Modified cookie jar and redirect response
pub async fn handle_logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build();

    (jar.add(cookie), Redirect::to("/"))
}
