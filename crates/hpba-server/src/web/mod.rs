mod analysis;
mod auth;
mod dashboard;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    response::Html,
    routing::{get, post},
    Router,
};
use hpba_client::{AnalyzerClient, IdentityClient};
use hpba_core::{AppConfig, DomainPolicy, Identity};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::html;
use crate::middleware::{auth_gate, request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analyzer: AnalyzerClient,
    pub identity: IdentityClient,
    pub policy: DomainPolicy,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, analyzer: AnalyzerClient, identity: IdentityClient) -> Self {
        let policy = DomainPolicy::new(&config.allowed_domain);
        Self {
            config,
            analyzer,
            identity,
            policy,
        }
    }

    /// The user behind an access token. Provider failures count as signed out.
    pub async fn resolve_identity(&self, token: &str) -> Option<Identity> {
        match self.identity.get_user(token).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "session lookup failed, treating request as anonymous");
                None
            }
        }
    }

    /// Best-effort provider-side sign-out. Cookies are dropped regardless.
    pub async fn revoke_quietly(&self, token: &str) {
        if let Err(e) = self.identity.sign_out(token).await {
            tracing::warn!(error = %e, "session revocation failed");
        }
    }
}

/// Pages behind the auth gate. Responses are per-user, so never cached.
fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route("/dashboard/analyze", post(dashboard::analyze))
        .route("/dashboard/history/{id}/delete", post(dashboard::delete))
        .route("/analysis/{id}", get(analysis::show))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

pub fn build_app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::entry))
        .route("/guide", get(guide))
        .route("/health", get(health))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/signout", post(auth::sign_out));

    Router::new()
        .merge(public_routes)
        .merge(protected_router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    let request_id = req
                        .extensions()
                        .get::<RequestId>()
                        .map_or("", |id| id.0.as_str());
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    auth_gate,
                )),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn guide() -> Html<String> {
    Html(html::guide())
}
