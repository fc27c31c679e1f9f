use std::borrow::Cow;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::{Form, cookie::SignedCookieJar};
use serde::Deserialize;

use crate::web::{
    AppState, data,
    flash::{self, FlashLevel},
    models::{QuestionDraft, QuestionType},
    templates::{self, PageLayout},
};

const INITIAL_QUESTION_ROWS: usize = 3;

/// Question rows arrive as repeated fields; the extractor collects them into
/// parallel vectors in document order. Every row submits all four fields, so
/// the vectors stay index-aligned.
#[derive(Deserialize)]
pub(crate) struct AuthoringForm {
    form_title: String,
    #[serde(default)]
    form_description: String,
    #[serde(default)]
    question_text: Vec<String>,
    #[serde(default)]
    question_type: Vec<QuestionType>,
    #[serde(default)]
    question_options: Vec<String>,
    #[serde(default)]
    question_required: Vec<String>,
}

pub async fn create_form_page(jar: SignedCookieJar) -> (SignedCookieJar, Html<String>) {
    let (jar, messages) = flash::take_flash(jar);
    let flash_html = templates::render_flash_messages(&messages);
    (jar, Html(render_authoring_page(&flash_html)))
}

pub async fn create_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AuthoringForm>,
) -> Result<(SignedCookieJar, Redirect), (StatusCode, Html<String>)> {
    let title = form.form_title.trim();
    if title.is_empty() {
        // Previously entered question fields are not preserved.
        let jar = flash::push_flash(jar, FlashLevel::Error, "Form title is required.");
        return Ok((jar, Redirect::to("/create")));
    }

    let description = Some(form.form_description.trim()).filter(|text| !text.is_empty());
    let questions = collect_question_drafts(&form);

    let form_id = data::insert_form_with_questions(state.pool_ref(), title, description, &questions)
        .await
        .map_err(templates::internal_error)?;

    let jar = flash::push_flash(
        jar,
        FlashLevel::Success,
        "Form created successfully. Share the link below for responses.",
    );
    Ok((jar, Redirect::to(&format!("/form/{form_id}/submit"))))
}

/// Rows whose text is blank after trimming are skipped; the remaining rows
/// keep their relative order, which becomes their sort order.
fn collect_question_drafts(form: &AuthoringForm) -> Vec<QuestionDraft> {
    let mut drafts = Vec::new();

    for (index, raw_text) in form.question_text.iter().enumerate() {
        let text = raw_text.trim();
        if text.is_empty() {
            continue;
        }

        let question_type = form
            .question_type
            .get(index)
            .copied()
            .unwrap_or(QuestionType::ShortText);
        let options = form
            .question_options
            .get(index)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let is_required = form
            .question_required
            .get(index)
            .is_some_and(|value| value == "yes");

        drafts.push(QuestionDraft {
            text: text.to_string(),
            question_type,
            options,
            is_required,
        });
    }

    drafts
}

fn render_authoring_page(flash_html: &str) -> String {
    let rows: String = (0..INITIAL_QUESTION_ROWS)
        .map(|_| question_row_html())
        .collect();
    let template_row = question_row_html();

    let body = format!(
        r#"<form method="post" action="/create">
            <section class="panel">
                <h2>Form details</h2>
                <label for="form_title">Title</label>
                <input type="text" id="form_title" name="form_title" placeholder="e.g. Workshop feedback">
                <label for="form_description">Description (optional)</label>
                <textarea id="form_description" name="form_description" rows="3" placeholder="Tell respondents what this is about"></textarea>
            </section>
            <section class="panel">
                <h2>Questions</h2>
                <p class="meta">Rows left blank are ignored. Options apply to multiple-choice questions only.</p>
                <div id="question-list">
                    {rows}
                </div>
                <div class="actions">
                    <button type="button" class="secondary" id="add-question">Add question</button>
                    <button type="submit">Create form</button>
                </div>
            </section>
        </form>
        <template id="question-row-template">{template_row}</template>"#,
    );

    let script = r#"<script>
document.getElementById('add-question').addEventListener('click', function () {
    var template = document.getElementById('question-row-template');
    document.getElementById('question-list').appendChild(template.content.cloneNode(true));
});
</script>"#;

    templates::render_page(PageLayout {
        meta_title: "New form - Feedback Forms",
        page_heading: "Create a feedback form",
        subtitle: Cow::Borrowed("Give the form a title and add as many questions as you need."),
        header_action_html: Cow::Borrowed(r#"<a class="back-link" href="/">← All forms</a>"#),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
        body_scripts: vec![Cow::Borrowed(script)],
    })
}

fn question_row_html() -> String {
    let type_options: String = QuestionType::ALL
        .iter()
        .map(|qtype| {
            format!(
                r#"<option value="{value}">{label}</option>"#,
                value = qtype.as_str(),
                label = qtype.label(),
            )
        })
        .collect();

    format!(
        r#"<fieldset class="panel">
            <label>Question text</label>
            <input type="text" name="question_text" placeholder="Question text">
            <label>Type</label>
            <select name="question_type">{type_options}</select>
            <label>Options</label>
            <input type="text" name="question_options" placeholder="Semicolon or comma separated, e.g. Yes; No">
            <label>Required</label>
            <select name="question_required">
                <option value="yes">Yes</option>
                <option value="no">No</option>
            </select>
        </fieldset>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> AuthoringForm {
        AuthoringForm {
            form_title: "Event X".to_string(),
            form_description: String::new(),
            question_text: Vec::new(),
            question_type: Vec::new(),
            question_options: Vec::new(),
            question_required: Vec::new(),
        }
    }

    #[test]
    fn collects_rows_in_order_with_one_based_positions() {
        let mut form = base_form();
        form.question_text = vec!["How was it?".to_string(), "Any comments?".to_string()];
        form.question_type = vec![QuestionType::Rating, QuestionType::LongText];
        form.question_options = vec![String::new(), String::new()];
        form.question_required = vec!["yes".to_string(), "no".to_string()];

        let drafts = collect_question_drafts(&form);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].text, "How was it?");
        assert_eq!(drafts[0].question_type, QuestionType::Rating);
        assert!(drafts[0].is_required);
        assert_eq!(drafts[1].text, "Any comments?");
        assert!(!drafts[1].is_required);
    }

    #[test]
    fn blank_rows_are_skipped_without_stopping_collection() {
        let mut form = base_form();
        form.question_text = vec![
            "First".to_string(),
            "   ".to_string(),
            "Third".to_string(),
        ];
        form.question_type = vec![
            QuestionType::ShortText,
            QuestionType::ShortText,
            QuestionType::MultipleChoice,
        ];
        form.question_options = vec![String::new(), String::new(), "Yes; No".to_string()];
        form.question_required = vec!["no".to_string(), "no".to_string(), "yes".to_string()];

        let drafts = collect_question_drafts(&form);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].text, "First");
        assert_eq!(drafts[1].text, "Third");
        assert_eq!(drafts[1].options.as_deref(), Some("Yes; No"));
    }

    #[test]
    fn missing_companion_fields_fall_back_to_defaults() {
        let mut form = base_form();
        form.question_text = vec!["Only text was sent".to_string()];

        let drafts = collect_question_drafts(&form);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].question_type, QuestionType::ShortText);
        assert_eq!(drafts[0].options, None);
        assert!(!drafts[0].is_required);
    }
}
