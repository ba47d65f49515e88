use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use hpba_core::auth::{check_access, is_protected, ENTRY_PATH};
use hpba_core::{decide, GateDecision, Identity};
use uuid::Uuid;

use crate::session;
use crate::web::AppState;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Identity resolved by [`auth_gate`] for the current request.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<Identity>);

/// Paths served without consulting the identity provider.
const UNGATED_PATHS: [&str; 2] = ["/health", "/favicon.ico"];

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Resolves the session once per request and applies the access rules.
///
/// Protected paths need a signed-in user from the allowed domain. A session
/// from any other domain is revoked and its cookies dropped. A signed-in,
/// allowed user landing on the entry page is sent to the dashboard.
pub async fn auth_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if UNGATED_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    let token = session::access_token(&jar);
    let identity = match &token {
        Some(token) if needs_session(&path) => state.resolve_identity(token).await,
        _ => None,
    };

    let decision = decide(&path, identity.as_ref(), &state.policy);
    if decision == GateDecision::Allow {
        req.extensions_mut().insert(CurrentUser(identity));
        return next.run(req).await;
    }

    if let (GateDecision::RedirectToEntry { sign_out: true, .. }, Some(token)) = (&decision, &token)
    {
        tracing::warn!(
            path = %path,
            email = identity.as_ref().and_then(|i| i.email.as_deref()).unwrap_or(""),
            "signing out account outside the allowed domain"
        );
        state.revoke_quietly(token).await;
    }
    rejection(&decision, jar)
}

/// The entry page needs the session too: a signed-in user skips it.
fn needs_session(path: &str) -> bool {
    is_protected(path) || path == ENTRY_PATH
}

/// Redirect for a non-`Allow` decision, dropping session cookies when the
/// decision signs the user out.
fn rejection(decision: &GateDecision, jar: CookieJar) -> Response {
    let location = decision
        .location()
        .unwrap_or_else(|| ENTRY_PATH.to_string());
    match decision {
        GateDecision::RedirectToEntry { sign_out: true, .. } => {
            (session::cleared(jar), Redirect::to(&location)).into_response()
        }
        _ => Redirect::to(&location).into_response(),
    }
}

/// Extractor for handlers that need a signed-in, allowed user.
///
/// Repeats the gate's check against the identity it stored, so a handler
/// mounted outside the gated paths still cannot be reached anonymously.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Identity);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<CurrentUser>()
            .and_then(|user| user.0.clone());

        match check_access(identity.as_ref(), &state.policy) {
            GateDecision::Allow => identity
                .map(RequireUser)
                .ok_or_else(|| Redirect::to(ENTRY_PATH).into_response()),
            decision => Err(rejection(&decision, CookieJar::from_headers(&parts.headers))),
        }
    }
}
