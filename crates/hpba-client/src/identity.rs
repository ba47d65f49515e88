//! Client for the hosted identity provider (GoTrue-style `/auth/v1` API).
//!
//! Sign-in is an OAuth authorization-code flow with a PKCE verifier: the
//! dashboard redirects to [`IdentityClient::authorize_url`], receives a code on
//! its callback, and trades it for a session with
//! [`IdentityClient::exchange_code`]. The access token is then resolved to an
//! [`Identity`] on every request.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hpba_core::{AppConfig, Identity};
use rand::distr::Alphanumeric;
use rand::Rng;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::IdentityError;

const API_KEY_HEADER: &str = "apikey";
const VERIFIER_LEN: usize = 64;

/// PKCE verifier/challenge pair using the `S256` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    /// `BASE64URL(SHA256(verifier))` without padding.
    pub challenge: String,
}

impl PkcePair {
    /// A fresh random verifier (64 alphanumeric characters, within the
    /// 43..=128 range PKCE allows).
    #[must_use]
    pub fn generate() -> Self {
        let verifier: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(VERIFIER_LEN)
            .map(char::from)
            .collect();
        Self::from_verifier(verifier)
    }

    #[must_use]
    pub fn from_verifier(verifier: String) -> Self {
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }

    #[must_use]
    pub fn method(&self) -> &'static str {
        "s256"
    }
}

/// Tokens returned by a successful code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    user: Option<UserPayload>,
}

impl Session {
    /// The user embedded in the token response, when the provider sent one.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.user.clone().map(Identity::from)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserPayload> for Identity {
    fn from(user: UserPayload) -> Self {
        Identity {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: Url,
    anon_key: String,
    provider: String,
}

impl IdentityClient {
    /// # Errors
    ///
    /// Returns [`IdentityError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`IdentityError::InvalidBaseUrl`] if the URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, IdentityError> {
        Self::with_base_url(
            &config.idp_url,
            &config.idp_anon_key,
            &config.idp_oauth_provider,
        )
    }

    /// Creates a client against an arbitrary base URL (for wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`IdentityClient::new`].
    pub fn with_base_url(
        base_url: &str,
        anon_key: &str,
        provider: &str,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("hpba-dashboard/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| IdentityError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            anon_key: anon_key.to_owned(),
            provider: provider.to_owned(),
        })
    }

    /// Where to send the browser to start sign-in. The provider redirects
    /// back to `redirect_to` with `?code=...` appended.
    ///
    /// # Errors
    ///
    /// [`IdentityError::InvalidBaseUrl`] if the authorize path cannot be joined.
    pub fn authorize_url(&self, redirect_to: &str, pkce: &PkcePair) -> Result<Url, IdentityError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", &self.provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", pkce.method());
        Ok(url)
    }

    /// Trades an authorization code for a session.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Rejected`] when the provider refuses the code.
    /// - [`IdentityError::Http`] on network failure.
    /// - [`IdentityError::Deserialize`] if the token response has the wrong shape.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Session, IdentityError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "pkce");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .json(&serde_json::json!({
                "auth_code": code,
                "code_verifier": verifier,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IdentityError::Deserialize {
            context: "token exchange".to_string(),
            source: e,
        })
    }

    /// Resolves an access token to the signed-in user.
    ///
    /// Returns `Ok(None)` when the provider says the token is invalid or
    /// expired, which callers treat as "not signed in".
    ///
    /// # Errors
    ///
    /// [`IdentityError::Rejected`] for any other non-2xx status, plus the
    /// usual transport and decoding failures.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, IdentityError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            s if !s.is_success() => return Err(rejected(response).await),
            _ => {}
        }

        let body = response.text().await?;
        let user: UserPayload =
            serde_json::from_str(&body).map_err(|e| IdentityError::Deserialize {
                context: "user lookup".to_string(),
                source: e,
            })?;
        Ok(Some(user.into()))
    }

    /// Revokes the session on the provider side.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Rejected`] on a non-2xx status other than 401, or
    /// [`IdentityError::Http`] on network failure.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let url = self.endpoint("auth/v1/logout")?;
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        // An already-expired token has nothing left to revoke.
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(rejected(response).await)
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base_url
            .join(path)
            .map_err(|e| IdentityError::InvalidBaseUrl(format!("cannot join '{path}': {e}")))
    }
}

async fn rejected(response: Response) -> IdentityError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });
    IdentityError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Providers of this family report errors under several different keys.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}
