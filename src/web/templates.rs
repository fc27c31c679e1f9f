use std::borrow::Cow;

use axum::{http::StatusCode, response::Html};
use chrono::{Datelike, Utc};
use tracing::error;

use super::flash::Flash;

const BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; min-height: 100vh; display: flex; flex-direction: column; }
        header { background: #ffffff; padding: 2rem 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; max-width: 860px; margin: 0 auto; }
        .header-bar h1 { margin: 0; font-size: 1.7rem; }
        .header-bar p { margin: 0.35rem 0 0; color: #64748b; }
        .back-link { display: inline-flex; align-items: center; gap: 0.4rem; color: #1d4ed8; text-decoration: none; font-weight: 600; background: #e0f2fe; padding: 0.5rem 0.95rem; border-radius: 999px; border: 1px solid #bfdbfe; transition: background 0.15s ease, border 0.15s ease; }
        .back-link:hover { background: #bfdbfe; border-color: #93c5fd; }
        main { flex: 1; padding: 2rem 1.5rem; max-width: 860px; margin: 0 auto; width: 100%; box-sizing: border-box; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; margin-bottom: 1.5rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); }
        .panel h2 { margin-top: 0; }
        .panel .meta { color: #64748b; font-size: 0.9rem; }
        label { display: block; margin-bottom: 0.5rem; font-weight: 600; color: #0f172a; }
        input[type="text"], input[type="email"], textarea, select { width: 100%; padding: 0.75rem; margin-bottom: 1rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; font-size: 1rem; box-sizing: border-box; }
        input:focus, textarea:focus, select:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.12); }
        input[type="checkbox"], input[type="radio"] { margin-right: 0.5rem; }
        .choice-label { font-weight: 400; }
        button { padding: 0.85rem 1.2rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; font-size: 1rem; cursor: pointer; transition: background 0.15s ease; }
        button:hover { background: #1d4ed8; }
        button.secondary { background: #e2e8f0; color: #0f172a; }
        button.secondary:hover { background: #cbd5e1; }
        button.danger { background: #fee2e2; color: #b91c1c; padding: 0.45rem 0.9rem; font-size: 0.85rem; }
        button.danger:hover { background: #fecaca; }
        .errors { background: #fef2f2; border: 1px solid #fecaca; border-radius: 10px; padding: 1rem 1.25rem; margin-bottom: 1.5rem; color: #b91c1c; }
        .errors ul { margin: 0; padding-left: 1.25rem; }
        .actions { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
        .actions a { color: #2563eb; text-decoration: none; font-weight: 600; }
        .actions a:hover { text-decoration: underline; }
        .actions form { margin: 0; }
        table { width: 100%; border-collapse: collapse; margin-top: 0.75rem; }
        th, td { padding: 0.6rem 0.85rem; border-bottom: 1px solid #e2e8f0; text-align: left; }
        th { background: #f1f5f9; font-weight: 600; }
        .stat { font-size: 1.1rem; }
        .stat strong { font-size: 1.6rem; }
        .type-tag { display: inline-block; padding: 0.2rem 0.7rem; border-radius: 999px; font-size: 0.8rem; font-weight: 600; background: #e0f2fe; color: #1d4ed8; }
        .required-mark { color: #b91c1c; }
        .empty { color: #64748b; }
        .app-footer { margin-top: 3rem; padding-bottom: 1.5rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 640px) {
            header { padding: 1.5rem 1rem; }
            main { padding: 1.5rem 1rem; }
            .header-bar { flex-direction: column; align-items: flex-start; }
        }
"#;

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub page_heading: &'a str,
    pub subtitle: Cow<'a, str>,
    pub header_action_html: Cow<'a, str>,
    pub flash_html: Cow<'a, str>,
    pub body_html: Cow<'a, str>,
    pub body_scripts: Vec<Cow<'a, str>>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        page_heading,
        subtitle,
        header_action_html,
        flash_html,
        body_html,
        body_scripts,
    } = layout;

    let footer = render_footer();
    let scripts = body_scripts
        .into_iter()
        .map(|script| script.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{BASE_STYLES}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <div>
                <h1>{page_heading}</h1>
                <p>{subtitle}</p>
            </div>
            {header_action_html}
        </div>
    </header>
    <main>
        {flash_html}
        {body_html}
        {footer}
    </main>
{scripts}
</body>
</html>"#,
    )
}

pub fn render_flash_messages(messages: &[Flash]) -> String {
    messages
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="flash {class}">{message}</div>"#,
                class = flash.level.css_class(),
                message = escape_html(&flash.message),
            )
        })
        .collect()
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(r#"<footer class="app-footer">© {current_year} Feedback Forms</footer>"#)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Storage failures are terminal for the request: log and answer with a
/// generic error page.
pub(crate) fn internal_error(err: anyhow::Error) -> (StatusCode, Html<String>) {
    error!(?err, "internal error while handling request");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render_page(PageLayout {
            meta_title: "Server error - Feedback Forms",
            page_heading: "Something went wrong",
            subtitle: Cow::Borrowed("The request could not be completed. Please try again."),
            header_action_html: Cow::Borrowed(r#"<a class="back-link" href="/">← All forms</a>"#),
            flash_html: Cow::Borrowed(""),
            body_html: Cow::Borrowed(""),
            body_scripts: Vec::new(),
        })),
    )
}
