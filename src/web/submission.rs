use std::{borrow::Cow, collections::HashMap};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, cookie::SignedCookieJar};

use crate::web::{
    AppState, data, escape_html,
    flash::{self, FlashLevel},
    models::{
        AnswerValue, FormRow, QuestionRow, QuestionType, RATING_MAX, RATING_MIN, RespondentInfo,
    },
    templates::{self, PageLayout},
};

const PROMPT_PREVIEW_CHARS: usize = 50;

pub async fn submit_page(
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
    jar: SignedCookieJar,
) -> Result<Response, (StatusCode, Html<String>)> {
    let pool = state.pool();
    let Some(form) = data::fetch_form(&pool, form_id)
        .await
        .map_err(|err| templates::internal_error(err.into()))?
    else {
        let jar = flash::push_flash(jar, FlashLevel::Error, "Form not found.");
        return Ok((jar, Redirect::to("/")).into_response());
    };

    let questions = data::fetch_questions(&pool, form_id)
        .await
        .map_err(|err| templates::internal_error(err.into()))?;

    let (jar, messages) = flash::take_flash(jar);
    let flash_html = templates::render_flash_messages(&messages);
    Ok((jar, Html(render_submit_page(&form, &questions, &flash_html, &[]))).into_response())
}

pub async fn submit_response(
    State(state): State<AppState>,
    Path(form_id): Path<i64>,
    jar: SignedCookieJar,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, (StatusCode, Html<String>)> {
    let pool = state.pool();
    let Some(form) = data::fetch_form(&pool, form_id)
        .await
        .map_err(|err| templates::internal_error(err.into()))?
    else {
        let jar = flash::push_flash(jar, FlashLevel::Error, "Form not found.");
        return Ok((jar, Redirect::to("/")).into_response());
    };

    let questions = data::fetch_questions(&pool, form_id)
        .await
        .map_err(|err| templates::internal_error(err.into()))?;

    let outcome = validate_submission(&questions, &fields);
    if !outcome.errors.is_empty() {
        let (jar, _) = flash::take_flash(jar);
        return Ok((
            jar,
            Html(render_submit_page(&form, &questions, "", &outcome.errors)),
        )
            .into_response());
    }

    let respondent = respondent_from_fields(&fields);
    data::insert_response(&pool, form_id, &respondent, &outcome.answers)
        .await
        .map_err(templates::internal_error)?;

    let jar = flash::push_flash(
        jar,
        FlashLevel::Success,
        "Thank you! Your feedback has been submitted.",
    );
    Ok((jar, Redirect::to(&format!("/form/{form_id}/submit"))).into_response())
}

pub(crate) struct SubmissionOutcome {
    pub errors: Vec<String>,
    pub answers: Vec<(i64, AnswerValue)>,
}

/// Checks every question independently and collects all errors before the
/// page is redisplayed. A required rating must parse as an integer in [1,5];
/// an optional rating outside that range is recorded as absent. Text answers
/// are trimmed; a required one must be non-empty, an optional one may be
/// recorded empty.
pub(crate) fn validate_submission(
    questions: &[QuestionRow],
    fields: &HashMap<String, String>,
) -> SubmissionOutcome {
    let mut errors = Vec::new();
    let mut answers = Vec::new();

    for question in questions {
        let key = format!("q_{}", question.id);
        match question.question_type {
            QuestionType::Rating => {
                let value = fields
                    .get(&key)
                    .and_then(|raw| raw.trim().parse::<i64>().ok())
                    .filter(|v| (RATING_MIN..=RATING_MAX).contains(v));

                match value {
                    Some(v) => answers.push((question.id, AnswerValue::Rating(v))),
                    None if question.is_required => errors.push(format!(
                        "Question '{}...' must be answered (rating 1-5).",
                        prompt_preview(&question.question_text),
                    )),
                    None => {}
                }
            }
            _ => {
                let text = fields.get(&key).map(|raw| raw.trim()).unwrap_or("");
                if question.is_required && text.is_empty() {
                    errors.push(format!(
                        "Question '{}...' is required.",
                        prompt_preview(&question.question_text),
                    ));
                } else {
                    answers.push((question.id, AnswerValue::Text(text.to_string())));
                }
            }
        }
    }

    SubmissionOutcome { errors, answers }
}

/// The anonymity flag wins over anything typed into the name/email fields.
pub(crate) fn respondent_from_fields(fields: &HashMap<String, String>) -> RespondentInfo {
    let is_anonymous = fields.get("is_anonymous").is_some_and(|value| value == "on");
    if is_anonymous {
        return RespondentInfo {
            is_anonymous: true,
            name: None,
            email: None,
        };
    }

    let name = fields
        .get("respondent_name")
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let email = fields
        .get("respondent_email")
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    RespondentInfo {
        is_anonymous: false,
        name,
        email,
    }
}

fn prompt_preview(text: &str) -> String {
    text.chars().take(PROMPT_PREVIEW_CHARS).collect()
}

fn render_submit_page(
    form: &FormRow,
    questions: &[QuestionRow],
    flash_html: &str,
    errors: &[String],
) -> String {
    let errors_html = if errors.is_empty() {
        String::new()
    } else {
        let items: String = errors
            .iter()
            .map(|error| format!("<li>{}</li>", escape_html(error)))
            .collect();
        format!(r#"<div class="errors"><ul>{items}</ul></div>"#)
    };

    let question_blocks: String = questions
        .iter()
        .enumerate()
        .map(|(index, question)| question_block(index + 1, question))
        .collect();

    let body = format!(
        r#"{errors_html}
        <form method="post" action="/form/{id}/submit">
            {question_blocks}
            <section class="panel">
                <h2>About you</h2>
                <label><input type="checkbox" name="is_anonymous" checked> Submit anonymously</label>
                <label for="respondent_name">Name (optional)</label>
                <input type="text" id="respondent_name" name="respondent_name">
                <label for="respondent_email">Email (optional)</label>
                <input type="email" id="respondent_email" name="respondent_email">
            </section>
            <button type="submit">Submit feedback</button>
        </form>"#,
        id = form.id,
    );

    let subtitle = form
        .description
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "Your feedback is appreciated.".to_string());

    templates::render_page(PageLayout {
        meta_title: &format!("{} - Feedback Forms", escape_html(&form.title)),
        page_heading: &escape_html(&form.title),
        subtitle: Cow::Owned(subtitle),
        header_action_html: Cow::Borrowed(r#"<a class="back-link" href="/">← All forms</a>"#),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
        body_scripts: Vec::new(),
    })
}

fn question_block(position: usize, question: &QuestionRow) -> String {
    let required_mark = if question.is_required {
        r#" <span class="required-mark">*</span>"#
    } else {
        ""
    };

    format!(
        r#"<section class="panel">
            <label>{position}. {text}{required_mark}</label>
            {input}
        </section>"#,
        text = escape_html(&question.question_text),
        input = question_input(question),
    )
}

fn question_input(question: &QuestionRow) -> String {
    let name = format!("q_{}", question.id);
    match question.question_type {
        QuestionType::ShortText => {
            format!(r#"<input type="text" name="{name}">"#)
        }
        QuestionType::LongText => {
            format!(r#"<textarea name="{name}" rows="4"></textarea>"#)
        }
        QuestionType::MultipleChoice => question
            .choice_options()
            .iter()
            .map(|option| {
                let escaped = escape_html(option);
                format!(
                    r#"<label class="choice-label"><input type="radio" name="{name}" value="{escaped}"> {escaped}</label>"#
                )
            })
            .collect(),
        QuestionType::Rating => (RATING_MIN..=RATING_MAX)
            .map(|value| {
                format!(
                    r#"<label class="choice-label"><input type="radio" name="{name}" value="{value}"> {value}</label>"#
                )
            })
            .collect(),
    }
}
