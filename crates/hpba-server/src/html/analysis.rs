//! Analysis detail page: selector, histogram, scatter and the salon table.
//!
//! The page is stateless. Sort column, direction, filter text and highlighted
//! salon travel in the query string, and every control is a link or a GET form
//! that produces the next state.

use std::fmt::Write as _;

use hpba_core::format::{price_cell, thousands};
use hpba_core::table::{SortDirection, SortKey, SortState};
use hpba_core::views::{toggle_highlight, AnalysisView};
use hpba_core::Identity;

use super::charts::{histogram_svg, scatter_svg};
use super::{encode, escape, layout, user_nav};

/// Page state as it appears in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState<'a> {
    pub sort: Option<SortState>,
    pub filter: &'a str,
    pub highlight: Option<&'a str>,
}

impl<'a> PageState<'a> {
    pub fn of(view: &'a AnalysisView) -> Self {
        Self {
            sort: view.sort,
            filter: &view.filter,
            highlight: view.highlight.as_deref(),
        }
    }

    /// `/analysis/{id}?...` for this state. Defaults are left out.
    pub fn href(&self, id: &str) -> String {
        let mut params = Vec::new();
        if let Some(sort) = self.sort.filter(|s| *s != SortState::default()) {
            params.push(format!("sort={}", sort.key.as_str()));
            params.push(format!("order={}", sort.direction.as_str()));
        }
        if !self.filter.is_empty() {
            params.push(format!("q={}", encode(self.filter)));
        }
        if let Some(name) = self.highlight {
            params.push(format!("highlight={}", encode(name)));
        }
        let mut href = format!("/analysis/{}", encode(id));
        if !params.is_empty() {
            href.push('?');
            href.push_str(&params.join("&"));
        }
        href
    }

    /// Hidden inputs carrying everything but `skip` through a GET form.
    fn hidden_inputs(&self, skip: &str) -> String {
        let mut out = String::new();
        if let Some(sort) = self.sort {
            let _ = write!(
                out,
                r#"<input type="hidden" name="sort" value="{}"><input type="hidden" name="order" value="{}">"#,
                sort.key.as_str(),
                sort.direction.as_str()
            );
        }
        if skip != "q" && !self.filter.is_empty() {
            let _ = write!(
                out,
                r#"<input type="hidden" name="q" value="{}">"#,
                escape(self.filter)
            );
        }
        if skip != "highlight" {
            if let Some(name) = self.highlight {
                let _ = write!(
                    out,
                    r#"<input type="hidden" name="highlight" value="{}">"#,
                    escape(name)
                );
            }
        }
        out
    }
}

fn column_title(key: SortKey) -> &'static str {
    match key {
        SortKey::Rank => "#",
        SortKey::Name => "Salon",
        SortKey::BlogCount => "Blogs",
        SortKey::ReviewCount => "Reviews",
        SortKey::MinPrice => "Min price",
        SortKey::MaxPrice => "Max price",
        SortKey::AveragePrice => "Avg price",
    }
}

pub fn render(view: &AnalysisView, user: &Identity) -> String {
    let state = PageState::of(view);
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<p><a href="/dashboard">&larr; Dashboard</a></p>
<section>
<h1>{title}</h1>
<p class="muted">{created} / <a href="{target}" target="_blank" rel="noopener">{target}</a> / {count} salons</p>
</section>"#,
        title = escape(&view.title),
        created = escape(&view.created_at),
        target = escape(&view.target_url),
        count = view.salons.len(),
    );

    if view.salons.is_empty() {
        body.push_str(r#"<section><p class="muted">This analysis found no salons.</p></section>"#);
        return layout(&view.title, &user_nav(user.email.as_deref()), &body);
    }

    body.push_str(&selector(view, &state));

    let histogram = view.histogram();
    let highlighted = view.highlighted_bin(&histogram);
    let _ = write!(
        body,
        "<section><h2>Price distribution</h2>{}</section>",
        histogram_svg(&histogram, view.highlight.is_some(), highlighted)
    );
    let _ = write!(
        body,
        "<section><h2>Reviews vs. average price</h2>{}</section>",
        scatter_svg(&view.scatter(), view.highlight.as_deref())
    );

    body.push_str(&table(view, &state));

    layout(&view.title, &user_nav(user.email.as_deref()), &body)
}

fn selector(view: &AnalysisView, state: &PageState<'_>) -> String {
    let mut out = String::from(
        r#"<section><h2>Compare a salon</h2><form method="get" onchange="this.submit()">"#,
    );
    out.push_str(&state.hidden_inputs("highlight"));
    out.push_str(r#"<select name="highlight"><option value="">None</option>"#);
    for option in view.selector_options() {
        let selected = if view.highlight.as_deref() == Some(option.name.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            out,
            r#"<option value="{value}"{selected}>{name} ({price})</option>"#,
            value = escape(&option.name),
            name = escape(&option.name),
            price = escape(&option.price_label),
        );
    }
    out.push_str(r#"</select> <noscript><button type="submit">Show</button></noscript></form>"#);

    if let Some(name) = &view.highlight {
        let clear = PageState {
            highlight: None,
            ..state.clone()
        };
        let _ = write!(
            out,
            r#"<p class="muted">Highlighting {} / <a href="{}">clear</a></p>"#,
            escape(name),
            escape(&clear.href(&view.id)),
        );
    }
    out.push_str("</section>");
    out
}

fn table(view: &AnalysisView, state: &PageState<'_>) -> String {
    let arranged = view.table();
    let mut out = String::from("<section><h2>Salons</h2>");

    let _ = write!(
        out,
        r#"<form method="get">{hidden}<input type="text" name="q" placeholder="Filter by name" value="{q}"> <button type="submit">Filter</button> <span class="muted">{count}</span></form>"#,
        hidden = state.hidden_inputs("q"),
        q = escape(&view.filter),
        count = escape(&arranged.count_label()),
    );

    out.push_str("<table><thead><tr>");
    for key in SortKey::ALL {
        let next = view
            .sort
            .map_or_else(|| SortState::default().toggle(key), |s| s.toggle(key));
        let marker = match view.sort {
            Some(s) if s.key == key && s.direction == SortDirection::Ascending => " ▲",
            Some(s) if s.key == key => " ▼",
            _ => "",
        };
        let href = PageState {
            sort: Some(next),
            ..state.clone()
        }
        .href(&view.id);
        let _ = write!(
            out,
            r#"<th><a href="{}">{}{marker}</a></th>"#,
            escape(&href),
            column_title(key)
        );
    }
    out.push_str("</tr></thead><tbody>");

    for salon in &arranged.rows {
        let class = if view.highlight.as_deref() == Some(salon.name.as_str()) {
            r#" class="highlight""#
        } else {
            ""
        };
        let toggled = toggle_highlight(view.highlight.as_deref(), Some(&salon.name));
        let focus = PageState {
            highlight: toggled.as_deref(),
            ..state.clone()
        }
        .href(&view.id);
        let _ = write!(
            out,
            r#"<tr{class}><td>{rank}</td><td><a href="{focus}">{name}</a> <a href="{url}" target="_blank" rel="noopener">&#8599;</a></td><td>{blogs}</td><td>{reviews}</td><td>{min}</td><td>{max}</td><td>{avg}</td></tr>"#,
            rank = salon.rank.map_or_else(|| "-".to_string(), |r| r.to_string()),
            focus = escape(&focus),
            name = escape(&salon.name),
            url = escape(&salon.url),
            blogs = thousands(u64::from(salon.blog_count)),
            reviews = thousands(u64::from(salon.review_count)),
            min = price_cell(salon.min_price),
            max = price_cell(salon.max_price),
            avg = price_cell(salon.average_price),
        );
    }
    if arranged.rows.is_empty() {
        out.push_str(r#"<tr><td colspan="7" class="muted">No salons match the filter.</td></tr>"#);
    }
    out.push_str("</tbody></table></section>");
    out
}
