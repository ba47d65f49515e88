//! Session cookies.
//!
//! The access token issued by the identity provider is the whole session; the
//! server keeps no state of its own. The PKCE verifier lives only between
//! `/auth/login` and `/auth/callback`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const ACCESS_COOKIE: &str = "hpba_access_token";
pub const VERIFIER_COOKIE: &str = "hpba_pkce_verifier";

const VERIFIER_PATH: &str = "/auth";

pub fn access_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn with_access_token(jar: CookieJar, token: String, secure: bool) -> CookieJar {
    jar.add(
        Cookie::build((ACCESS_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure),
    )
}

pub fn with_verifier(jar: CookieJar, verifier: String, secure: bool) -> CookieJar {
    jar.add(
        Cookie::build((VERIFIER_COOKIE, verifier))
            .path(VERIFIER_PATH)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure),
    )
}

/// Reads and removes the PKCE verifier.
pub fn take_verifier(jar: CookieJar) -> (CookieJar, Option<String>) {
    let verifier = jar
        .get(VERIFIER_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());
    let jar = jar.remove(Cookie::build(VERIFIER_COOKIE).path(VERIFIER_PATH));
    (jar, verifier)
}

/// Drops every session cookie.
pub fn cleared(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(VERIFIER_COOKIE).path(VERIFIER_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips_through_jar() {
        let jar = with_access_token(CookieJar::new(), "tok".to_string(), true);
        assert_eq!(access_token(&jar).as_deref(), Some("tok"));

        let cookie = jar.get(ACCESS_COOKIE).expect("cookie set");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn empty_access_cookie_is_no_session() {
        let jar = CookieJar::new().add(Cookie::new(ACCESS_COOKIE, ""));
        assert!(access_token(&jar).is_none());
    }

    #[test]
    fn verifier_is_taken_once() {
        let jar = with_verifier(CookieJar::new(), "verifier".to_string(), false);
        let (jar, verifier) = take_verifier(jar);
        assert_eq!(verifier.as_deref(), Some("verifier"));
        assert!(jar.get(VERIFIER_COOKIE).is_none());
    }

    #[test]
    fn cleared_removes_session() {
        let jar = with_access_token(CookieJar::new(), "tok".to_string(), false);
        assert!(access_token(&cleared(jar)).is_none());
    }
}
