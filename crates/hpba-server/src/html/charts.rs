//! Inline SVG charts for the analysis page.

use std::fmt::Write as _;

use hpba_core::format::{thousands, yen};
use hpba_core::histogram::{BinTone, Histogram};
use hpba_core::scatter::{extents, ScatterPoint};

use super::escape;

const WIDTH: f64 = 760.0;
const HIST_HEIGHT: f64 = 300.0;
const SCATTER_HEIGHT: f64 = 320.0;
const LEFT: f64 = 48.0;
const RIGHT: f64 = 16.0;
const TOP: f64 = 28.0;
const BOTTOM: f64 = 64.0;

/// Most x-axis labels drawn before thinning to every n-th bin.
const MAX_X_LABELS: usize = 14;

const AVERAGE_LINE: &str = "#ef4444";
const POINT: &str = "#10b981";
const POINT_HIGHLIGHT: &str = "#f59e0b";

/// Bar chart of salons per 500 yen price bin.
///
/// `highlighted` is the bin holding the selected salon; `selection_active`
/// mutes every other bar even when the selected salon has no bin.
#[allow(clippy::cast_precision_loss)]
pub fn histogram_svg(
    histogram: &Histogram,
    selection_active: bool,
    highlighted: Option<usize>,
) -> String {
    if histogram.is_empty() {
        return r#"<p class="muted">No price data to chart.</p>"#.to_string();
    }

    let plot_w = WIDTH - LEFT - RIGHT;
    let plot_h = HIST_HEIGHT - TOP - BOTTOM;
    let bins = &histogram.bins;
    let bar_w = plot_w / bins.len() as f64;
    let max_count = histogram.max_bin_count.max(1) as f64;
    let label_every = bins.len().div_ceil(MAX_X_LABELS).max(1);
    let tones = histogram.tones(selection_active, highlighted);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg viewBox="0 0 {WIDTH} {HIST_HEIGHT}" width="100%" role="img" aria-label="Price distribution">"#
    );
    let _ = write!(
        svg,
        r##"<line x1="{LEFT}" y1="{y}" x2="{x2}" y2="{y}" stroke="#cbd5e1"/>"##,
        y = TOP + plot_h,
        x2 = WIDTH - RIGHT,
    );
    let _ = write!(
        svg,
        r##"<text x="{x}" y="{y}" font-size="11" fill="#64748b" text-anchor="end">{max}</text>"##,
        x = LEFT - 6.0,
        y = TOP + 4.0,
        max = histogram.max_bin_count,
    );

    for (i, (bin, tone)) in bins.iter().zip(&tones).enumerate() {
        let h = bin.count as f64 / max_count * plot_h;
        let x = LEFT + i as f64 * bar_w;
        let y = TOP + plot_h - h;
        let (names, more) = bin.tooltip_names();
        let mut tooltip = format!("{}: {} salons", bin.label(), bin.count);
        for name in names {
            tooltip.push('\n');
            tooltip.push_str(name);
        }
        if more > 0 {
            let _ = write!(tooltip, "\n+{more} more");
        }
        let stroke = if *tone == BinTone::Highlighted {
            r##" stroke="#b45309" stroke-width="2""##
        } else {
            ""
        };
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}"{stroke}><title>{tooltip}</title></rect>"#,
            w = (bar_w - 2.0).max(1.0),
            fill = tone.fill(),
            tooltip = escape(&tooltip),
        );

        if i % label_every == 0 {
            let lx = x + bar_w / 2.0;
            let ly = TOP + plot_h + 14.0;
            let _ = write!(
                svg,
                r##"<text x="{lx:.1}" y="{ly:.1}" font-size="10" fill="#64748b" text-anchor="end" transform="rotate(-40 {lx:.1} {ly:.1})">{label}</text>"##,
                label = escape(&bin.label()),
            );
        }
    }

    if let Some((index, label)) = histogram.average_marker() {
        let x = LEFT + (index as f64 + 0.5) * bar_w;
        let _ = write!(
            svg,
            r#"<line x1="{x:.1}" y1="{TOP}" x2="{x:.1}" y2="{y2:.1}" stroke="{AVERAGE_LINE}" stroke-width="2" stroke-dasharray="6 4"/>"#,
            y2 = TOP + plot_h,
        );
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" font-size="11" font-weight="700" fill="{AVERAGE_LINE}" text-anchor="middle">{label}</text>"#,
            y = TOP - 10.0,
            label = escape(&label),
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Review count (x) against average price (y), one dot per priced salon.
#[allow(clippy::cast_precision_loss)]
pub fn scatter_svg(points: &[ScatterPoint], highlight: Option<&str>) -> String {
    let Some((max_reviews, max_price)) = extents(points) else {
        return r#"<p class="muted">No price data to chart.</p>"#.to_string();
    };

    let plot_w = WIDTH - LEFT - RIGHT;
    let plot_h = SCATTER_HEIGHT - TOP - BOTTOM;
    let x_max = f64::from(max_reviews.max(1));
    let y_max = if max_price > 0.0 { max_price } else { 1.0 };

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg viewBox="0 0 {WIDTH} {SCATTER_HEIGHT}" width="100%" role="img" aria-label="Reviews against price">"#
    );
    let _ = write!(
        svg,
        r##"<line x1="{LEFT}" y1="{y}" x2="{x2}" y2="{y}" stroke="#cbd5e1"/><line x1="{LEFT}" y1="{TOP}" x2="{LEFT}" y2="{y}" stroke="#cbd5e1"/>"##,
        y = TOP + plot_h,
        x2 = WIDTH - RIGHT,
    );
    let _ = write!(
        svg,
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#64748b" text-anchor="end">{reviews}</text>"##,
        x = WIDTH - RIGHT,
        y = TOP + plot_h + 18.0,
        reviews = thousands(u64::from(max_reviews)),
    );
    let _ = write!(
        svg,
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#64748b" text-anchor="end">{price}</text>"##,
        x = LEFT - 6.0,
        y = TOP + 4.0,
        price = yen(max_price),
    );
    let _ = write!(
        svg,
        r##"<text x="{x:.1}" y="{y:.1}" font-size="11" fill="#64748b" text-anchor="middle">Reviews</text>"##,
        x = LEFT + plot_w / 2.0,
        y = SCATTER_HEIGHT - 16.0,
    );

    // Highlighted dot last so it sits on top.
    let (selected, others): (Vec<&ScatterPoint>, Vec<&ScatterPoint>) = points
        .iter()
        .partition(|p| highlight == Some(p.name.as_str()));
    for (point, is_selected) in others
        .into_iter()
        .map(|p| (p, false))
        .chain(selected.into_iter().map(|p| (p, true)))
    {
        let cx = LEFT + f64::from(point.review_count) / x_max * plot_w;
        let cy = TOP + plot_h - point.average_price / y_max * plot_h;
        let (r, fill) = if is_selected {
            (8.0, POINT_HIGHLIGHT)
        } else {
            (5.0, POINT)
        };
        let _ = write!(
            svg,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r}" fill="{fill}" fill-opacity="0.8"><title>{title}</title></circle>"#,
            title = escape(&format!(
                "{}\n{} reviews / {}",
                point.name,
                thousands(u64::from(point.review_count)),
                yen(point.average_price)
            )),
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpba_core::{build_histogram, SalonRecord};

    fn salon(name: &str, reviews: u32, average_price: Option<f64>) -> SalonRecord {
        SalonRecord {
            name: name.to_string(),
            url: String::new(),
            blog_count: 0,
            review_count: reviews,
            coupon_prices: vec![],
            min_price: None,
            max_price: None,
            average_price,
            rank: None,
        }
    }

    fn records() -> Vec<SalonRecord> {
        vec![
            salon("A", 100, Some(5000.0)),
            salon("B", 40, Some(8000.0)),
            salon("C", 300, Some(3000.0)),
        ]
    }

    #[test]
    fn histogram_draws_one_bar_per_bin_and_average() {
        let hist = build_histogram(&records());
        let svg = histogram_svg(&hist, false, None);
        assert_eq!(svg.matches("<rect").count(), hist.bins.len());
        assert!(svg.contains("AREA AVG: ¥5,333"));
        assert!(svg.contains("¥5,000~: 1 salons"));
    }

    #[test]
    fn histogram_marks_selected_bin() {
        let hist = build_histogram(&records());
        let index = hist.bin_index_of(&records(), "B");
        let svg = histogram_svg(&hist, true, index);
        assert_eq!(svg.matches(BinTone::Highlighted.fill()).count(), 1);
        assert!(!svg.contains(BinTone::Volume.fill()));
    }

    #[test]
    fn histogram_without_prices_shows_placeholder() {
        let hist = build_histogram(&[salon("X", 1, None)]);
        assert!(histogram_svg(&hist, false, None).contains("No price data"));
    }

    #[test]
    fn tooltip_names_are_escaped() {
        let hist = build_histogram(&[salon("<b>", 1, Some(1000.0))]);
        let svg = histogram_svg(&hist, false, None);
        assert!(svg.contains("&lt;b&gt;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn scatter_draws_priced_points_with_selection_last() {
        let mut salons = records();
        salons.push(salon("D", 10, None));
        let points = hpba_core::scatter::scatter_points(&salons);
        let svg = scatter_svg(&points, Some("A"));
        assert_eq!(svg.matches("<circle").count(), 3);
        let last = svg.rfind("<circle").expect("circle");
        assert!(svg[last..].contains(POINT_HIGHLIGHT));
    }

    #[test]
    fn scatter_without_points_shows_placeholder() {
        assert!(scatter_svg(&[], None).contains("No price data"));
    }
}
