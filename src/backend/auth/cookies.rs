/**
 * Session Cookies
 *
 * Login and refresh set `accessToken` and `refreshToken` as HttpOnly
 * cookies on `/`; logout removes both. The `Secure` attribute follows
 * `ServerConfig::secure_cookies` so plain-HTTP development still works.
 */

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::backend::auth::sessions::TokenPair;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Add both token cookies to `jar`
pub fn with_session(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, tokens.access_token.clone(), secure))
        .add(session_cookie(REFRESH_COOKIE, tokens.refresh_token.clone(), secure))
}

/// Expire both token cookies
pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}
