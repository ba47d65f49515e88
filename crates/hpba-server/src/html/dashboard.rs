use std::fmt::Write as _;

use hpba_core::views::DashboardView;
use hpba_core::Identity;

use super::{encode, escape, layout, user_nav};

const WAKING_NOTICE: &str =
    "The analysis server did not answer its health check and may be waking up. \
     The first analysis can take a little longer.";

pub fn render(view: &DashboardView, user: &Identity) -> String {
    let mut body = String::new();

    if let Some(notice) = &view.notice {
        let _ = write!(
            body,
            r#"<div class="notice danger">{}</div>"#,
            escape(notice)
        );
    }

    // The submit button is disabled on submit so a slow analysis cannot be
    // started twice from the same page.
    let _ = write!(
        body,
        r#"<section>
<h1>New analysis</h1>
<form method="post" action="/dashboard/analyze" onsubmit="this.querySelector('button').disabled = true">
<input type="url" name="url" placeholder="https://beauty.hotpepper.jp/..." value="{url}" required>
<button type="submit">Analyze</button>
</form>
<p class="muted">Paste a Hot Pepper Beauty salon list URL. Collecting every salon can take a few minutes.</p>"#,
        url = escape(&view.url_input),
    );
    if view.server_waking {
        let _ = write!(body, r#"<div class="notice">{WAKING_NOTICE}</div>"#);
    }
    if let Some(error) = &view.form_error {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape(error));
    }
    body.push_str("</section>");

    body.push_str("<section><h2>History</h2>");
    if view.history_unavailable {
        body.push_str(
            r#"<p class="muted">The history list could not be loaded. Reload the page to try again.</p>"#,
        );
    } else if view.history.is_empty() {
        body.push_str(r#"<p class="muted">No analyses yet.</p>"#);
    } else {
        body.push_str(r#"<ul class="history">"#);
        for item in &view.history {
            let id = encode(&item.id);
            let _ = write!(
                body,
                r#"<li><div><a href="/analysis/{id}">{title}</a><div class="muted">{created} / {count} salons</div></div>
<form method="post" action="/dashboard/history/{id}/delete" onsubmit="return confirm('Delete this analysis?')"><button class="danger" type="submit">Delete</button></form></li>"#,
                title = escape(item.display_title()),
                created = escape(&item.display_created_at()),
                count = item.salon_count,
            );
        }
        body.push_str("</ul>");
    }
    body.push_str("</section>");

    layout("Dashboard", &user_nav(user.email.as_deref()), &body)
}
