//! HTTP client for the salon analysis backend.
//!
//! Every data call identifies the caller with the `X-User-Id` header. The
//! backend reports failures as `{"detail": "..."}`; that text is surfaced as
//! [`ApiError::Server`] so the dashboard can show it verbatim.

use std::time::Duration;

use hpba_core::{AnalyzeRequest, AnalyzeResponse, AppConfig, HistoryDetail, HistoryItem};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

const USER_ID_HEADER: &str = "X-User-Id";

/// Health checks give up after this long and count as a failure.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

const HISTORY_DETAIL_FAILED: &str = "Failed to load history";

/// Unreserved URI characters stay literal in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the analysis backend.
///
/// Use [`AnalyzerClient::new`] with the configured backend URL, or
/// [`AnalyzerClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    client: Client,
    base_url: Url,
}

impl AnalyzerClient {
    /// Creates a client for the backend named in the app config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`ApiError::InvalidBaseUrl`] if the URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_url, config.api_timeout_secs)
    }

    /// Creates a client against an arbitrary base URL (for wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`AnalyzerClient::new`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("hpba-dashboard/0.1")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Submits a listing URL for scraping and analysis.
    ///
    /// This can take minutes on the backend side; the client-wide timeout
    /// applies.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Server`] on a non-2xx status, carrying the backend's
    ///   `detail` or `API Error: <status>`.
    /// - [`ApiError::Http`] on network failure or timeout.
    /// - [`ApiError::Deserialize`] if the success body has the wrong shape.
    pub async fn analyze(
        &self,
        user_id: &str,
        request: &AnalyzeRequest,
    ) -> Result<AnalyzeResponse, ApiError> {
        let url = self.endpoint("api/analyze")?;
        let response = self
            .client
            .post(url)
            .header(USER_ID_HEADER, user_id)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }
        let analysis: AnalyzeResponse = decode(response, "analyze").await?;
        tracing::info!(
            history_id = %analysis.history_id,
            salon_count = analysis.salon_count,
            "analysis completed"
        );
        Ok(analysis)
    }

    /// Lists the user's past analyses.
    ///
    /// Never fails: any error is logged and yields an empty list, so the
    /// dashboard still renders.
    pub async fn list_history(&self, user_id: &str) -> Vec<HistoryItem> {
        match self.try_list_history(user_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "history list unavailable, showing empty list");
                Vec::new()
            }
        }
    }

    /// Like [`Self::list_history`], but reports the failure instead of
    /// degrading to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-2xx status, or an
    /// unparseable body.
    pub async fn try_list_history(&self, user_id: &str) -> Result<Vec<HistoryItem>, ApiError> {
        let url = self.endpoint("api/history")?;
        let response = self
            .client
            .get(url)
            .header(USER_ID_HEADER, user_id)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(server_error(response).await);
        }
        decode(response, "history list").await
    }

    /// Fetches one stored analysis with its salon records.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Server`] on a non-2xx status, always with a generic
    ///   message regardless of the body.
    /// - [`ApiError::Http`] / [`ApiError::Deserialize`] as for
    ///   [`AnalyzerClient::analyze`].
    pub async fn history_detail(
        &self,
        user_id: &str,
        history_id: &str,
    ) -> Result<HistoryDetail, ApiError> {
        let url = self.history_url(history_id)?;
        let response = self
            .client
            .get(url)
            .header(USER_ID_HEADER, user_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                history_id,
                status = status.as_u16(),
                "history detail request failed"
            );
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: HISTORY_DETAIL_FAILED.to_string(),
            });
        }
        decode(response, &format!("history detail {history_id}")).await
    }

    /// Deletes one stored analysis. Returns `true` once the backend confirms.
    ///
    /// # Errors
    ///
    /// [`ApiError::Server`] with the backend's `detail` or `API Error: <status>`,
    /// or [`ApiError::Http`] on network failure.
    pub async fn delete_history(&self, user_id: &str, history_id: &str) -> Result<bool, ApiError> {
        let url = self.history_url(history_id)?;
        let response = self
            .client
            .delete(url)
            .header(USER_ID_HEADER, user_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }
        tracing::info!(history_id, "history deleted");
        Ok(true)
    }

    /// `GET /health` with a fixed 5 second timeout. Any failure is `false`.
    pub async fn health(&self) -> bool {
        let url = match self.endpoint("health") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "health check skipped");
                return false;
            }
        };
        match self.client.get(url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "health check failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                false
            }
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("cannot join '{path}': {e}")))
    }

    fn history_url(&self, history_id: &str) -> Result<Url, ApiError> {
        let id = utf8_percent_encode(history_id, PATH_SEGMENT);
        self.endpoint(&format!("api/history/{id}"))
    }
}

/// Reads a failed response into [`ApiError::Server`], preferring the
/// backend's `detail` string over `API Error: <status>`.
async fn server_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = detail_message(&body).unwrap_or_else(|| format!("API Error: {status}"));
    tracing::warn!(status, message = %message, "analysis backend returned an error");
    ApiError::Server { status, message }
}

/// The non-empty string `detail` field of a JSON error body, if any.
pub(crate) fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
