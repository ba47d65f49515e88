//! Price histogram: fixed-width bucketing of average prices.
//!
//! Bins are half-open `[lower, upper)` intervals of [`BIN_WIDTH`] yen starting
//! at zero. The last bin is the one containing the highest average price, so
//! a maximum that sits exactly on a boundary (e.g. `8000`) opens its own bin
//! `[8000, 8500)` instead of falling off the end.
//!
//! At most [`MAX_BINS`] bins are built. Prices at or past the last possible
//! bin are left off the chart like unpriced salons.

use crate::format::{thousands, yen};
use crate::salon::SalonRecord;

/// Width of every histogram bin, in yen.
pub const BIN_WIDTH: u64 = 500;

/// Upper limit on the number of bins, i.e. a ¥1,000,000 ceiling.
pub const MAX_BINS: usize = 2_000;

/// Member names shown in a bin's tooltip before collapsing into "+N more".
pub const TOOLTIP_NAMES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBin {
    pub lower_bound: u64,
    pub upper_bound: u64,
    pub count: usize,
    /// Names of the salons in this bin, in input order.
    pub member_names: Vec<String>,
}

impl PriceBin {
    /// Axis label, e.g. `¥5,000~`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("¥{}~", thousands(self.lower_bound))
    }

    #[allow(clippy::cast_precision_loss)]
    fn contains(&self, price: f64) -> bool {
        price >= self.lower_bound as f64 && price < self.upper_bound as f64
    }

    /// The first few member names plus how many were left out.
    #[must_use]
    pub fn tooltip_names(&self) -> (&[String], usize) {
        let shown = self.member_names.len().min(TOOLTIP_NAMES);
        (
            &self.member_names[..shown],
            self.member_names.len() - shown,
        )
    }
}

/// How a bar should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinTone {
    /// Tallest bar(s), no selection active.
    Volume,
    /// Non-empty bar, no selection active.
    Occupied,
    /// Empty bar, no selection active.
    Empty,
    /// Bar containing the selected salon.
    Highlighted,
    /// Any other bar while a selection is active.
    Muted,
}

impl BinTone {
    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            BinTone::Volume => "#10B981",
            BinTone::Occupied => "#6EE7B7",
            BinTone::Empty => "#ECFDF5",
            BinTone::Highlighted => "#F59E0B",
            BinTone::Muted => "#F1F5F9",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<PriceBin>,
    /// Mean average price over the charted salons; `0.0` when there are none.
    pub overall_average: f64,
    pub max_bin_count: usize,
}

/// Bucket every salon with a charted average price into fixed-width bins.
///
/// Total over any input: salons without a usable price are skipped, and an
/// input with none yields an empty histogram with zero statistics.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn build_histogram(records: &[SalonRecord]) -> Histogram {
    let priced: Vec<(&SalonRecord, f64, usize)> = records
        .iter()
        .filter_map(|r| {
            let price = r.charted_price()?;
            bin_index(price).map(|index| (r, price, index))
        })
        .collect();

    let Some(top) = priced.iter().map(|(_, _, index)| *index).max() else {
        return Histogram::default();
    };

    let mut bins: Vec<PriceBin> = (0..=top as u64)
        .map(|i| PriceBin {
            lower_bound: i * BIN_WIDTH,
            upper_bound: (i + 1) * BIN_WIDTH,
            count: 0,
            member_names: Vec::new(),
        })
        .collect();

    for (record, _, index) in &priced {
        let bin = &mut bins[*index];
        bin.count += 1;
        bin.member_names.push(record.name.clone());
    }

    let overall_average =
        priced.iter().map(|(_, price, _)| *price).sum::<f64>() / priced.len() as f64;
    let max_bin_count = bins.iter().map(|b| b.count).max().unwrap_or(0);

    Histogram {
        bins,
        overall_average,
        max_bin_count,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
/// Bin for a non-negative price, or `None` past [`MAX_BINS`].
fn bin_index(price: f64) -> Option<usize> {
    let index = (price / BIN_WIDTH as f64).floor();
    (index >= 0.0 && index < MAX_BINS as f64).then_some(index as usize)
}

impl Histogram {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Index of the bin holding the first charted salon called `name`.
    ///
    /// `None` when no salon of that name has a charted price.
    #[must_use]
    pub fn bin_index_of(&self, records: &[SalonRecord], name: &str) -> Option<usize> {
        let price = records
            .iter()
            .filter(|r| r.name == name)
            .find_map(SalonRecord::charted_price)?;
        self.bins.iter().position(|b| b.contains(price))
    }

    /// Paint for each bar. `selection_active` greys every bar but
    /// `highlighted`, even when the selected salon has no bin.
    #[must_use]
    pub fn tones(&self, selection_active: bool, highlighted: Option<usize>) -> Vec<BinTone> {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                if selection_active {
                    if highlighted == Some(i) {
                        BinTone::Highlighted
                    } else {
                        BinTone::Muted
                    }
                } else if bin.count == self.max_bin_count {
                    BinTone::Volume
                } else if bin.count > 0 {
                    BinTone::Occupied
                } else {
                    BinTone::Empty
                }
            })
            .collect()
    }

    /// Bin index and label for the "area average" reference line, if any
    /// salon was charted.
    #[must_use]
    pub fn average_marker(&self) -> Option<(usize, String)> {
        if self.overall_average <= 0.0 {
            return None;
        }
        let last = self.bins.len().checked_sub(1)?;
        let index = bin_index(self.overall_average).map_or(last, |i| i.min(last));
        Some((index, format!("AREA AVG: {}", yen(self.overall_average))))
    }
}

#[cfg(test)]
#[path = "histogram_test.rs"]
mod tests;
