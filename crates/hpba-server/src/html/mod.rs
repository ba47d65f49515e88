//! Server-rendered pages.
//!
//! Every page is a complete HTML document built from a shared layout with
//! inline CSS, so the binary serves no separate assets. Charts are inline SVG.

pub mod analysis;
pub mod charts;
pub mod dashboard;

use std::fmt::Write as _;

use hpba_core::AuthErrorFlag;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Unreserved URI characters stay literal.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const STYLE: &str = r"
:root {
  --bg: #f8fafc;
  --surface: #ffffff;
  --border: #e2e8f0;
  --text: #0f172a;
  --muted: #64748b;
  --accent: #10b981;
  --warn: #f59e0b;
  --danger: #ef4444;
  --radius: 10px;
  --font: -apple-system, BlinkMacSystemFont, 'Hiragino Sans', 'Segoe UI', sans-serif;
}
* { box-sizing: border-box; }
body { margin: 0; background: var(--bg); color: var(--text); font-family: var(--font); }
header { display: flex; align-items: center; justify-content: space-between;
  padding: 12px 24px; background: var(--surface); border-bottom: 1px solid var(--border); }
header .brand { font-weight: 700; color: var(--text); text-decoration: none; }
header nav { display: flex; gap: 12px; align-items: center; font-size: 14px; }
main { max-width: 1080px; margin: 0 auto; padding: 24px; }
section { background: var(--surface); border: 1px solid var(--border);
  border-radius: var(--radius); padding: 20px; margin-bottom: 20px; }
h1 { font-size: 22px; margin: 0 0 8px; }
h2 { font-size: 17px; margin: 0 0 12px; }
a { color: #047857; }
.muted { color: var(--muted); font-size: 13px; }
.error { color: var(--danger); margin-top: 8px; }
.notice { background: #fef3c7; border: 1px solid var(--warn); border-radius: var(--radius);
  padding: 10px 14px; margin-bottom: 16px; }
.notice.danger { background: #fee2e2; border-color: var(--danger); }
input[type=text], input[type=url], select { padding: 8px 10px; border: 1px solid var(--border);
  border-radius: 6px; font-size: 14px; }
input[type=url] { width: 70%; }
button, .button { padding: 8px 14px; border: 0; border-radius: 6px; background: var(--accent);
  color: #fff; font-size: 14px; cursor: pointer; text-decoration: none; display: inline-block; }
button:disabled { opacity: .5; cursor: wait; }
button.link { background: none; color: var(--muted); padding: 0; }
button.danger { background: none; color: var(--danger); padding: 0; }
ul.history { list-style: none; padding: 0; margin: 0; }
ul.history li { display: flex; justify-content: space-between; align-items: center;
  padding: 10px 0; border-bottom: 1px solid var(--border); }
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { padding: 6px 8px; border-bottom: 1px solid var(--border); text-align: right; }
th:nth-child(2), td:nth-child(2) { text-align: left; }
th a { color: var(--text); text-decoration: none; }
tr.highlight td { background: #fef3c7; }
svg text { font-family: var(--font); }
.steps li { margin-bottom: 12px; }
";

/// Escapes text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encodes one path segment or query value.
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, UNRESERVED).to_string()
}

/// Wraps `body` in the shared document layout. `nav` is raw HTML for the
/// header's right-hand side.
pub fn layout(title: &str, nav: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | HPB Analyzer</title>
<style>{STYLE}</style>
</head>
<body>
<header><a class="brand" href="/dashboard">HPB Analyzer</a><nav>{nav}</nav></header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

/// Header links for a signed-in user.
pub fn user_nav(email: Option<&str>) -> String {
    let mut nav = String::new();
    if let Some(email) = email {
        let _ = write!(nav, r#"<span class="muted">{}</span>"#, escape(email));
    }
    nav.push_str(r#"<a href="/guide">Guide</a>"#);
    nav.push_str(
        r#"<form method="post" action="/auth/signout"><button class="link" type="submit">Sign out</button></form>"#,
    );
    nav
}

/// Sign-in page, with the one-shot notice from `?error=`.
pub fn entry(flag: Option<AuthErrorFlag>) -> String {
    let notice = flag.map_or_else(String::new, |flag| {
        format!(
            r#"<div class="notice danger">{}</div>"#,
            escape(flag.message())
        )
    });
    let body = format!(
        r#"<section>
<h1>HPB Analyzer</h1>
<p class="muted">Price distribution and review analysis for Hot Pepper Beauty salon listings.</p>
{notice}
<p><a class="button" href="/auth/login">Sign in with Google</a></p>
<p class="muted">Only organisation accounts can sign in.</p>
</section>"#
    );
    layout("Sign in", r#"<a href="/guide">Guide</a>"#, &body)
}

pub fn guide() -> String {
    let body = r#"<section>
<h1>How to use</h1>
<ol class="steps">
<li><strong>Find a listing page.</strong> Open Hot Pepper Beauty, search an area or
station, and copy the URL of the salon list page.</li>
<li><strong>Run the analysis.</strong> Paste the URL on the dashboard and press Analyze.
Collecting every salon can take a few minutes; the first request after a quiet
period may also wait for the analysis server to wake up.</li>
<li><strong>Read the results.</strong> The histogram shows how salons are spread over
average coupon price in 500 yen steps, with the area average marked. Pick a salon
to see where it sits. The table can be sorted by any column and filtered by name.</li>
</ol>
<p><a href="/dashboard">Back to dashboard</a></p>
</section>"#;
    layout("Guide", "", body)
}

/// Stand-alone failure page with a way back.
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"<section>
<h1>{}</h1>
<p class="error">{}</p>
<p><a href="/dashboard">Back to dashboard</a></p>
</section>"#,
        escape(title),
        escape(message)
    );
    layout(title, "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_markup_and_quotes() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape("サロン"), "サロン");
    }

    #[test]
    fn encode_keeps_unreserved() {
        assert_eq!(encode("abc-123_x.y~"), "abc-123_x.y~");
        assert_eq!(encode("a b&c"), "a%20b%26c");
        assert_eq!(encode("美容室"), "%E7%BE%8E%E5%AE%B9%E5%AE%A4");
    }

    #[test]
    fn entry_shows_flag_message() {
        let page = entry(Some(AuthErrorFlag::Unauthorized));
        assert!(page.contains(AuthErrorFlag::Unauthorized.message()));
        assert!(!entry(None).contains("notice danger"));
    }
}
