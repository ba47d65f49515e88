//! Salon table ordering and name filtering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::collate::compare_names;
use crate::salon::SalonRecord;

/// Rank used for salons that were never ranked, so they sort last.
const UNRANKED: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Rank,
    Name,
    BlogCount,
    ReviewCount,
    MinPrice,
    MaxPrice,
    AveragePrice,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Rank,
        SortKey::Name,
        SortKey::BlogCount,
        SortKey::ReviewCount,
        SortKey::MinPrice,
        SortKey::MaxPrice,
        SortKey::AveragePrice,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Rank => "rank",
            SortKey::Name => "name",
            SortKey::BlogCount => "blog_count",
            SortKey::ReviewCount => "review_count",
            SortKey::MinPrice => "min_price",
            SortKey::MaxPrice => "max_price",
            SortKey::AveragePrice => "average_price",
        }
    }

    /// Direction a column starts in when first selected: text-like columns
    /// ascending, magnitude columns largest first.
    #[must_use]
    pub fn default_direction(self) -> SortDirection {
        match self {
            SortKey::Rank | SortKey::Name => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    fn compare(self, a: &SalonRecord, b: &SalonRecord) -> Ordering {
        match self {
            SortKey::Rank => a
                .rank
                .unwrap_or(UNRANKED)
                .cmp(&b.rank.unwrap_or(UNRANKED)),
            SortKey::Name => compare_names(&a.name, &b.name),
            SortKey::BlogCount => a.blog_count.cmp(&b.blog_count),
            SortKey::ReviewCount => a.review_count.cmp(&b.review_count),
            SortKey::MinPrice => compare_prices(a.min_price, b.min_price),
            SortKey::MaxPrice => compare_prices(a.max_price, b.max_price),
            SortKey::AveragePrice => compare_prices(a.average_price, b.average_price),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

/// Missing prices compare as positive infinity.
fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(f64::INFINITY)
        .total_cmp(&b.unwrap_or(f64::INFINITY))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Active column and direction of the salon table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Rank,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// State after the user clicks the `key` column header.
    ///
    /// Clicking the active column flips direction; clicking another column
    /// switches to it in its default direction.
    #[must_use]
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: key.default_direction(),
            }
        }
    }
}

/// Table rows after filtering and sorting, plus the unfiltered size.
#[derive(Debug, Clone, PartialEq)]
pub struct Arranged {
    pub rows: Vec<SalonRecord>,
    pub total: usize,
}

impl Arranged {
    #[must_use]
    pub fn shown(&self) -> usize {
        self.rows.len()
    }

    /// `1 / total 3`
    #[must_use]
    pub fn count_label(&self) -> String {
        format!("{} / total {}", self.shown(), self.total)
    }
}

/// Filter `records` by a case-insensitive name substring, then sort.
///
/// `sort` of `None` (an unrecognised column) keeps the filtered rows in input
/// order. The sort is stable, so ties also keep input order in both
/// directions. The input slice is never reordered.
#[must_use]
pub fn arrange(records: &[SalonRecord], sort: Option<SortState>, filter: &str) -> Arranged {
    let needle = filter.trim().to_lowercase();
    let mut rows: Vec<SalonRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if let Some(state) = sort {
        rows.sort_by(|a, b| {
            let ord = state.key.compare(a, b);
            match state.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    Arranged {
        rows,
        total: records.len(),
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
