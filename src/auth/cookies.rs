//! Session cookies holding the auth service's tokens.

use tower_cookies::{
    cookie::{time::Duration as CookieDuration, SameSite},
    Cookie, Cookies,
};

use super::{SessionChange, SessionTokens};
use crate::supabase::auth::Session;

pub const ACCESS_COOKIE:  &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

// The refresh cookie outlives the access token; once the access cookie is
// gone the next request refreshes the session.
const SESSION_DAYS: i64 = 30;

pub fn read_tokens(cookies: &Cookies) -> SessionTokens {
    let value = |name: &str| {
        cookies
            .get(name)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty())
    };
    SessionTokens {
        access_token:  value(ACCESS_COOKIE),
        refresh_token: value(REFRESH_COOKIE),
    }
}

pub fn apply(cookies: &Cookies, change: &SessionChange, secure: bool) {
    match change {
        SessionChange::Unchanged => {}
        SessionChange::Refreshed(session) => set_session_cookies(cookies, session, secure),
        SessionChange::Expired => clear_session_cookies(cookies),
    }
}

pub fn set_session_cookies(cookies: &Cookies, session: &Session, secure: bool) {
    let access_ttl = access_max_age(session);
    let refresh_ttl = CookieDuration::days(SESSION_DAYS);
    cookies.add(session_cookie(ACCESS_COOKIE, &session.access_token, secure, access_ttl));
    cookies.add(session_cookie(REFRESH_COOKIE, &session.refresh_token, secure, refresh_ttl));
}

pub fn clear_session_cookies(cookies: &Cookies) {
    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        cookies.add(session_cookie(name, "", false, CookieDuration::ZERO));
    }
}

/// Access cookie lives as long as the token; sessions without an expiry get
/// the full session lifetime.
fn access_max_age(session: &Session) -> CookieDuration {
    if session.expires_in > 0 {
        CookieDuration::seconds(session.expires_in)
    } else {
        CookieDuration::days(SESSION_DAYS)
    }
}

fn session_cookie(
    name: &'static str,
    value: &str,
    secure: bool,
    max_age: CookieDuration,
) -> Cookie<'static> {
    Cookie::build((name, value.to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(max_age)
        .build()
}
