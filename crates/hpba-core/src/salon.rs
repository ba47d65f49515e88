use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// One salon listing scraped by the analysis backend.
///
/// Produced wholesale by the backend and never modified here, apart from the
/// display `rank` the analysis view assigns before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonRecord {
    pub name: String,
    /// Salon page on the listing site.
    pub url: String,
    #[serde(default)]
    pub blog_count: u32,
    #[serde(default)]
    pub review_count: u32,
    /// Coupon prices observed on the salon page, in listing order.
    #[serde(default)]
    pub coupon_prices: Vec<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// `None` when no price could be derived for the salon.
    pub average_price: Option<f64>,
    /// 1-based position in the received result set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl SalonRecord {
    /// The average price when it is usable for charting: present, finite and
    /// non-negative.
    #[must_use]
    pub fn charted_price(&self) -> Option<f64> {
        self.average_price.filter(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub history_id: String,
    pub salon_count: u32,
    #[serde(default)]
    pub salons: Vec<SalonRecord>,
}

/// Row of `GET /api/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub created_at: String,
    pub target_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub salon_count: u32,
}

impl HistoryItem {
    #[must_use]
    pub fn display_title(&self) -> &str {
        display_title(self.title.as_deref(), &self.target_url)
    }

    #[must_use]
    pub fn display_created_at(&self) -> String {
        display_timestamp(&self.created_at)
    }
}

/// Body of `GET /api/history/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDetail {
    pub id: String,
    pub created_at: String,
    pub target_url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub raw_data: Vec<SalonRecord>,
}

impl HistoryDetail {
    #[must_use]
    pub fn display_title(&self) -> &str {
        display_title(self.title.as_deref(), &self.target_url)
    }

    #[must_use]
    pub fn display_created_at(&self) -> String {
        display_timestamp(&self.created_at)
    }
}

/// The stored title, or the path of the target URL when the title is blank.
fn display_title<'a>(title: Option<&'a str>, target_url: &'a str) -> &'a str {
    match title {
        Some(t) if !t.trim().is_empty() => t,
        _ => url_path(target_url),
    }
}

fn url_path(url: &str) -> &str {
    let Some((_, rest)) = url.split_once("://") else {
        return url;
    };
    let path = rest.find('/').map_or("/", |i| &rest[i..]);
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// `2026/01/31 09:05` for RFC 3339 input; anything else is shown verbatim.
fn display_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |ts| ts.format("%Y/%m/%d %H:%M").to_string(),
    )
}
