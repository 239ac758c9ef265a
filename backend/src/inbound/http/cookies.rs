//! Credential cookies set by login and refresh, cleared by logout.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use chrono::TimeDelta;

use super::state::CookieSettings;

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

fn base(name: &'static str, value: String, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build(name, value)
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(settings.secure)
        .finish()
}

/// HttpOnly cookie living as long as the token it carries.
pub fn credential_cookie(
    name: &'static str,
    value: String,
    lifetime: TimeDelta,
    settings: CookieSettings,
) -> Cookie<'static> {
    let mut cookie = base(name, value, settings);
    cookie.set_max_age(CookieDuration::seconds(lifetime.num_seconds()));
    cookie
}

/// Expired, empty cookie that makes the browser drop `name`.
pub fn removal_cookie(name: &'static str, settings: CookieSettings) -> Cookie<'static> {
    let mut cookie = base(name, String::new(), settings);
    cookie.make_removal();
    cookie
}
