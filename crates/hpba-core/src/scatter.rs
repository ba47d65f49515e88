use crate::salon::SalonRecord;

/// One salon plotted as review count against average price.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub name: String,
    pub review_count: u32,
    pub average_price: f64,
}

/// Points for every salon with a charted average price, in input order.
#[must_use]
pub fn scatter_points(records: &[SalonRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter_map(|r| {
            r.charted_price().map(|price| ScatterPoint {
                name: r.name.clone(),
                review_count: r.review_count,
                average_price: price,
            })
        })
        .collect()
}

/// Axis extents `(max_reviews, max_price)` for a non-empty plot.
#[must_use]
pub fn extents(points: &[ScatterPoint]) -> Option<(u32, f64)> {
    if points.is_empty() {
        return None;
    }
    let max_reviews = points.iter().map(|p| p.review_count).max().unwrap_or(0);
    let max_price = points
        .iter()
        .map(|p| p.average_price)
        .fold(0.0_f64, f64::max);
    Some((max_reviews, max_price))
}
