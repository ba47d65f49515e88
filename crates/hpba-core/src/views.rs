//! Per-screen state for the dashboard and analysis views.
//!
//! Each view owns its state outright; transitions replace data wholesale
//! and the engines derive everything else on demand.

use crate::error::ValidationError;
use crate::format::yen;
use crate::histogram::{build_histogram, Histogram};
use crate::salon::{HistoryDetail, HistoryItem, SalonRecord};
use crate::scatter::{scatter_points, ScatterPoint};
use crate::table::{arrange, Arranged, SortState};

/// Dashboard: URL form plus the user's past analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub history: Vec<HistoryItem>,
    /// Last URL typed into the form, echoed back after a failed submit.
    pub url_input: String,
    /// Inline message under the form.
    pub form_error: Option<String>,
    /// Health check failed before the last analyze attempt.
    pub server_waking: bool,
    /// Banner for a failed history deletion.
    pub notice: Option<String>,
    /// The history list could not be fetched, so an empty `history` means
    /// "unknown" rather than "none yet".
    pub history_unavailable: bool,
}

impl DashboardView {
    #[must_use]
    pub fn with_history(history: Vec<HistoryItem>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    pub fn validation_failed(&mut self, url: &str, error: &ValidationError) {
        self.url_input = url.to_string();
        self.form_error = Some(error.to_string());
    }

    pub fn mark_server_waking(&mut self) {
        self.server_waking = true;
    }

    pub fn analyze_failed(&mut self, url: &str, message: impl Into<String>) {
        self.url_input = url.to_string();
        self.form_error = Some(message.into());
    }

    /// A rejected delete leaves the list exactly as it was.
    pub fn delete_failed(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn mark_history_unavailable(&mut self) {
        self.history.clear();
        self.history_unavailable = true;
    }

    pub fn delete_succeeded(&mut self, refreshed: Vec<HistoryItem>) {
        self.history = refreshed;
        self.history_unavailable = false;
        self.notice = None;
    }
}

/// Entry of the salon selector above the histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorOption {
    pub name: String,
    pub price_label: String,
}

/// Analysis detail: one stored result with chart/table presentation state.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub target_url: String,
    /// Salons with `rank` assigned from received order.
    pub salons: Vec<SalonRecord>,
    pub highlight: Option<String>,
    /// `None` when an unrecognised column was requested.
    pub sort: Option<SortState>,
    pub filter: String,
}

impl AnalysisView {
    #[must_use]
    pub fn from_detail(detail: HistoryDetail) -> Self {
        let title = detail.display_title().to_string();
        let created_at = detail.display_created_at();
        Self {
            id: detail.id,
            title,
            created_at,
            target_url: detail.target_url,
            salons: with_ranks(detail.raw_data),
            highlight: None,
            sort: Some(SortState::default()),
            filter: String::new(),
        }
    }

    /// Apply a selection: the highlighted salon again or `None` clears it.
    pub fn select(&mut self, name: Option<&str>) {
        self.highlight = toggle_highlight(self.highlight.as_deref(), name);
    }

    #[must_use]
    pub fn histogram(&self) -> Histogram {
        build_histogram(&self.salons)
    }

    #[must_use]
    pub fn highlighted_bin(&self, histogram: &Histogram) -> Option<usize> {
        self.highlight
            .as_deref()
            .and_then(|name| histogram.bin_index_of(&self.salons, name))
    }

    #[must_use]
    pub fn table(&self) -> Arranged {
        arrange(&self.salons, self.sort, &self.filter)
    }

    #[must_use]
    pub fn scatter(&self) -> Vec<ScatterPoint> {
        scatter_points(&self.salons)
    }

    /// Priced salons cheapest first.
    #[must_use]
    pub fn selector_options(&self) -> Vec<SelectorOption> {
        let mut priced: Vec<(&SalonRecord, f64)> = self
            .salons
            .iter()
            .filter_map(|s| s.average_price.filter(|p| *p > 0.0).map(|p| (s, p)))
            .collect();
        priced.sort_by(|a, b| a.1.total_cmp(&b.1));
        priced
            .into_iter()
            .map(|(s, p)| SelectorOption {
                name: s.name.clone(),
                price_label: yen(p),
            })
            .collect()
    }
}

/// Assign 1-based ranks in received order.
#[must_use]
pub fn with_ranks(salons: Vec<SalonRecord>) -> Vec<SalonRecord> {
    salons
        .into_iter()
        .zip(1_u32..)
        .map(|(salon, rank)| SalonRecord {
            rank: Some(rank),
            ..salon
        })
        .collect()
}

/// Highlight after `clicked` is chosen while `current` is highlighted.
#[must_use]
pub fn toggle_highlight(current: Option<&str>, clicked: Option<&str>) -> Option<String> {
    match clicked {
        None => None,
        Some(name) if current == Some(name) => None,
        Some(name) => Some(name.to_string()),
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
