use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use hpba_client::ApiError;
use hpba_core::table::{SortDirection, SortKey, SortState};
use hpba_core::views::AnalysisView;
use serde::Deserialize;

use super::AppState;
use crate::html;
use crate::middleware::RequireUser;

const LOAD_FAILED: &str = "Failed to load history";

/// Table and chart state carried in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    sort: Option<String>,
    order: Option<String>,
    q: Option<String>,
    highlight: Option<String>,
}

impl AnalysisQuery {
    /// An unrecognised `sort` leaves rows in received order; an unrecognised
    /// `order` falls back to the column's default direction.
    fn apply(self, view: &mut AnalysisView) {
        view.sort = match self.sort.as_deref() {
            None | Some("") => Some(SortState::default()),
            Some(raw) => raw.parse::<SortKey>().ok().map(|key| SortState {
                key,
                direction: self
                    .order
                    .as_deref()
                    .and_then(|o| o.parse::<SortDirection>().ok())
                    .unwrap_or_else(|| key.default_direction()),
            }),
        };
        view.filter = self.q.unwrap_or_default();
        view.select(self.highlight.as_deref().filter(|h| !h.is_empty()));
    }
}

pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Response {
    match state.analyzer.history_detail(&user.id, &id).await {
        Ok(detail) => {
            let mut view = AnalysisView::from_detail(detail);
            query.apply(&mut view);
            Html(html::analysis::render(&view, &user)).into_response()
        }
        Err(e) => {
            tracing::warn!(history_id = %id, error = %e, "history detail unavailable");
            let (status, message) = match &e {
                ApiError::Server {
                    status: 404,
                    message,
                } => (StatusCode::NOT_FOUND, message.as_str()),
                ApiError::Server { message, .. } => (StatusCode::BAD_GATEWAY, message.as_str()),
                _ => (StatusCode::BAD_GATEWAY, LOAD_FAILED),
            };
            (
                status,
                Html(html::error_page("Analysis unavailable", message)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpba_core::HistoryDetail;

    fn view() -> AnalysisView {
        AnalysisView::from_detail(HistoryDetail {
            id: "h-1".to_string(),
            created_at: String::new(),
            target_url: String::new(),
            title: None,
            user_id: "user-1".to_string(),
            raw_data: vec![],
        })
    }

    fn query(sort: Option<&str>, order: Option<&str>) -> AnalysisQuery {
        AnalysisQuery {
            sort: sort.map(str::to_string),
            order: order.map(str::to_string),
            ..AnalysisQuery::default()
        }
    }

    #[test]
    fn missing_sort_is_rank_ascending() {
        let mut v = view();
        query(None, None).apply(&mut v);
        assert_eq!(v.sort, Some(SortState::default()));
    }

    #[test]
    fn known_sort_uses_given_or_default_direction() {
        let mut v = view();
        query(Some("review_count"), Some("asc")).apply(&mut v);
        assert_eq!(
            v.sort,
            Some(SortState {
                key: SortKey::ReviewCount,
                direction: SortDirection::Ascending
            })
        );

        query(Some("review_count"), Some("sideways")).apply(&mut v);
        assert_eq!(
            v.sort.map(|s| s.direction),
            Some(SortDirection::Descending)
        );
    }

    #[test]
    fn unknown_sort_keeps_received_order() {
        let mut v = view();
        query(Some("rating"), None).apply(&mut v);
        assert_eq!(v.sort, None);
    }

    #[test]
    fn filter_and_highlight_are_applied() {
        let mut v = view();
        AnalysisQuery {
            q: Some("salon".to_string()),
            highlight: Some("A".to_string()),
            ..AnalysisQuery::default()
        }
        .apply(&mut v);
        assert_eq!(v.filter, "salon");
        assert_eq!(v.highlight.as_deref(), Some("A"));
    }

    #[test]
    fn empty_highlight_means_none() {
        let mut v = view();
        AnalysisQuery {
            highlight: Some(String::new()),
            ..AnalysisQuery::default()
        }
        .apply(&mut v);
        assert!(v.highlight.is_none());
    }
}
