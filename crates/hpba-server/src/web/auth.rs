//! Sign-in entry page and the OAuth round trip.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use hpba_client::PkcePair;
use hpba_core::auth::{entry_location, DASHBOARD_PATH, ENTRY_PATH};
use hpba_core::AuthErrorFlag;
use serde::Deserialize;
use url::{Position, Url};

use super::AppState;
use crate::{html, session};

#[derive(Debug, Deserialize)]
pub struct EntryQuery {
    error: Option<String>,
}

pub async fn entry(Query(query): Query<EntryQuery>) -> Html<String> {
    let flag = query
        .error
        .as_deref()
        .and_then(|raw| raw.parse::<AuthErrorFlag>().ok());
    Html(html::entry(flag))
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

/// Starts sign-in: stores a fresh PKCE verifier and sends the browser to the
/// identity provider.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    let next = safe_next(query.next.as_deref(), &state.config.public_url);
    let redirect_to = format!(
        "{}/auth/callback?next={}",
        state.config.public_url,
        html::encode(&next)
    );
    let pkce = PkcePair::generate();

    match state.identity.authorize_url(&redirect_to, &pkce) {
        Ok(url) => {
            let jar = session::with_verifier(jar, pkce.verifier, state.config.secure_cookies());
            (jar, Redirect::to(url.as_str())).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot build authorize URL");
            Redirect::to(&entry_location(Some(AuthErrorFlag::AuthFailed))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    next: Option<String>,
}

/// Finishes sign-in: trades the code for a session cookie.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let failed = Redirect::to(&entry_location(Some(AuthErrorFlag::AuthFailed)));
    let (jar, verifier) = session::take_verifier(jar);

    let (Some(code), Some(verifier)) = (query.code.filter(|c| !c.is_empty()), verifier) else {
        tracing::warn!("auth callback without code or verifier");
        return (jar, failed).into_response();
    };

    match state.identity.exchange_code(&code, &verifier).await {
        Ok(tokens) => {
            if let Some(identity) = tokens.identity() {
                tracing::info!(user_id = %identity.id, "signed in");
            }
            let jar = session::with_access_token(
                jar,
                tokens.access_token,
                state.config.secure_cookies(),
            );
            let next = safe_next(query.next.as_deref(), &state.config.public_url);
            (jar, Redirect::to(&next)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "auth code exchange failed");
            (jar, failed).into_response()
        }
    }
}

pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = session::access_token(&jar) {
        state.revoke_quietly(&token).await;
    }
    (session::cleared(jar), Redirect::to(ENTRY_PATH)).into_response()
}

/// Same-site absolute paths only; anything else lands on the dashboard.
fn safe_next(next: Option<&str>, public_url: &str) -> String {
    next.and_then(|path| local_path(path, public_url))
        .unwrap_or_else(|| DASHBOARD_PATH.to_string())
}

/// `path` re-serialised as path and query, if it resolves to the origin of
/// `public_url`. Browsers drop tabs and newlines and read `\` as `/`, so any
/// of those could turn a path into a foreign host and are refused outright.
fn local_path(path: &str, public_url: &str) -> Option<String> {
    if !path.starts_with('/')
        || path.starts_with("//")
        || path
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || c == '\\')
    {
        return None;
    }
    let base = Url::parse(public_url).ok()?;
    let target = base.join(path).ok()?;
    (target.origin() == base.origin()).then(|| target[Position::BeforePath..].to_string())
}
