use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use hpba_core::auth::DASHBOARD_PATH;
use hpba_core::views::DashboardView;
use hpba_core::{validate_listing_url, AnalyzeRequest};
use serde::Deserialize;

use super::AppState;
use crate::html;
use crate::middleware::RequireUser;

pub async fn show(State(state): State<AppState>, RequireUser(user): RequireUser) -> Html<String> {
    let history = state.analyzer.list_history(&user.id).await;
    Html(html::dashboard::render(
        &DashboardView::with_history(history),
        &user,
    ))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    url: String,
}

/// Validates the URL, checks backend health, then runs the analysis.
///
/// A failed health check only adds a notice; the analysis is attempted anyway
/// because a sleeping backend wakes up on the first real request.
pub async fn analyze(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    let url = match validate_listing_url(&form.url) {
        Ok(url) => url,
        Err(e) => {
            let history = state.analyzer.list_history(&user.id).await;
            let mut view = DashboardView::with_history(history);
            view.validation_failed(&form.url, &e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(html::dashboard::render(&view, &user)),
            )
                .into_response();
        }
    };

    let mut view = DashboardView::default();
    if !state.analyzer.health().await {
        tracing::warn!("analysis backend failed its health check; it may be waking up");
        view.mark_server_waking();
    }

    let request = AnalyzeRequest {
        url: url.clone(),
        max_pages: state.config.max_pages,
    };
    tracing::info!(user_id = %user.id, url = %url, "starting analysis");
    match state.analyzer.analyze(&user.id, &request).await {
        Ok(result) => {
            Redirect::to(&format!("/analysis/{}", html::encode(&result.history_id)))
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, url = %url, "analysis failed");
            view.history = state.analyzer.list_history(&user.id).await;
            view.analyze_failed(&url, e.to_string());
            (
                StatusCode::BAD_GATEWAY,
                Html(html::dashboard::render(&view, &user)),
            )
                .into_response()
        }
    }
}

/// Deletes one history entry. On failure the list is shown unchanged with a
/// notice. When the list itself cannot be reloaded the page says so instead
/// of showing an empty history.
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Response {
    match state.analyzer.delete_history(&user.id, &id).await {
        Ok(_) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(e) => {
            tracing::warn!(history_id = %id, error = %e, "history delete failed");
            let mut view = match state.analyzer.try_list_history(&user.id).await {
                Ok(history) => DashboardView::with_history(history),
                Err(list_err) => {
                    tracing::warn!(
                        error = %list_err,
                        "history list unavailable after failed delete"
                    );
                    let mut view = DashboardView::default();
                    view.mark_history_unavailable();
                    view
                }
            };
            view.delete_failed(format!("Delete failed: {e}"));
            Html(html::dashboard::render(&view, &user)).into_response()
        }
    }
}
