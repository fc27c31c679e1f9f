use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::web::{
    AppState, data, escape_html,
    flash::{self, FlashLevel},
    models::FormRow,
    templates::{self, PageLayout},
};

pub async fn landing_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), (StatusCode, Html<String>)> {
    let forms = data::fetch_forms(state.pool_ref())
        .await
        .map_err(|err| templates::internal_error(err.into()))?;

    let (jar, messages) = flash::take_flash(jar);
    let flash_html = templates::render_flash_messages(&messages);

    Ok((jar, Html(render_listing(&forms, &flash_html))))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect), (StatusCode, Html<String>)> {
    let removed = data::delete_form(state.pool_ref(), form_id)
        .await
        .map_err(|err| templates::internal_error(err.into()))?;

    let jar = if removed > 0 {
        flash::push_flash(jar, FlashLevel::Success, "Form deleted.")
    } else {
        flash::push_flash(jar, FlashLevel::Error, "Form not found.")
    };

    Ok((jar, Redirect::to("/")))
}

fn render_listing(forms: &[FormRow], flash_html: &str) -> String {
    let body = if forms.is_empty() {
        r#"<section class="panel"><p class="empty">No forms yet. Create the first one to start collecting feedback.</p></section>"#
            .to_string()
    } else {
        forms.iter().map(form_card).collect()
    };

    templates::render_page(PageLayout {
        meta_title: "Feedback Forms",
        page_heading: "Feedback Forms",
        subtitle: Cow::Borrowed("Create a form, share its link, and review the results."),
        header_action_html: Cow::Borrowed(r#"<a class="back-link" href="/create">+ New form</a>"#),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
        body_scripts: Vec::new(),
    })
}

fn form_card(form: &FormRow) -> String {
    let description = form
        .description
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(|text| format!("<p>{}</p>", escape_html(text)))
        .unwrap_or_default();

    format!(
        r#"<section class="panel">
            <h2>{title}</h2>
            {description}
            <p class="meta">Created {created}</p>
            <div class="actions">
                <a href="/form/{id}/submit">Fill out</a>
                <a href="/form/{id}/summary">Summary</a>
                <form method="post" action="/form/{id}/delete">
                    <button type="submit" class="danger">Delete</button>
                </form>
            </div>
        </section>"#,
        title = escape_html(&form.title),
        description = description,
        created = form.created_at.format("%Y-%m-%d %H:%M"),
        id = form.id,
    )
}
