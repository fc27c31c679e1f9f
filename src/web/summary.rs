use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use sqlx::SqliteConnection;

use crate::web::{
    AppState, data, escape_html,
    flash::{self, FlashLevel},
    models::{FormRow, QuestionRow, QuestionType},
    templates::{self, PageLayout},
};

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionSummary {
    pub question: QuestionRow,
    pub count: usize,
    pub choice_counts: Vec<(String, usize)>,
    pub avg_rating: Option<f64>,
    pub text_responses: Vec<String>,
}

pub async fn summary_page(
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

    // One connection serves the total count and every per-question scan.
    let mut conn = pool
        .acquire()
        .await
        .map_err(|err| templates::internal_error(err.into()))?;
    let total_responses = data::count_responses(&mut conn, form_id)
        .await
        .map_err(|err| templates::internal_error(err.into()))?;
    let summaries = build_summaries(&mut conn, &questions)
        .await
        .map_err(|err| templates::internal_error(err.into()))?;
    drop(conn);

    let (jar, messages) = flash::take_flash(jar);
    let flash_html = templates::render_flash_messages(&messages);
    Ok((
        jar,
        Html(render_summary_page(&form, total_responses, &summaries, &flash_html)),
    )
        .into_response())
}

/// Computes each question's statistics with a separate scan of the answers
/// table; no cross-question joins.
pub(crate) async fn build_summaries(
    conn: &mut SqliteConnection,
    questions: &[QuestionRow],
) -> sqlx::Result<Vec<QuestionSummary>> {
    let mut summaries = Vec::with_capacity(questions.len());

    for question in questions {
        let summary = match question.question_type {
            QuestionType::Rating => {
                let ratings = data::fetch_question_ratings(conn, question.id).await?;
                QuestionSummary {
                    question: question.clone(),
                    count: ratings.len(),
                    choice_counts: Vec::new(),
                    avg_rating: average_rating(&ratings),
                    text_responses: Vec::new(),
                }
            }
            QuestionType::MultipleChoice => {
                let choices = data::fetch_question_texts(conn, question.id).await?;
                QuestionSummary {
                    question: question.clone(),
                    count: choices.len(),
                    choice_counts: tally_choices(&choices),
                    avg_rating: None,
                    text_responses: Vec::new(),
                }
            }
            QuestionType::ShortText | QuestionType::LongText => {
                let texts = data::fetch_question_texts(conn, question.id).await?;
                QuestionSummary {
                    question: question.clone(),
                    count: texts.len(),
                    choice_counts: Vec::new(),
                    avg_rating: None,
                    text_responses: texts,
                }
            }
        };
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Arithmetic mean rounded to 2 decimal places; absent when no ratings were
/// recorded.
pub(crate) fn average_rating(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let mean = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

/// Tally in first-seen order.
pub(crate) fn tally_choices(choices: &[String]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for choice in choices {
        match counts.iter_mut().find(|(label, _)| label == choice) {
            Some((_, count)) => *count += 1,
            None => counts.push((choice.clone(), 1)),
        }
    }
    counts
}

fn render_summary_page(
    form: &FormRow,
    total_responses: i64,
    summaries: &[QuestionSummary],
    flash_html: &str,
) -> String {
    let question_panels: String = summaries
        .iter()
        .enumerate()
        .map(|(index, summary)| summary_panel(index + 1, summary))
        .collect();

    let body = format!(
        r#"<section class="panel">
            <p class="stat">Total responses: <strong>{total_responses}</strong></p>
        </section>
        {question_panels}"#,
    );

    let subtitle = form
        .description
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "Aggregated results for this form.".to_string());

    templates::render_page(PageLayout {
        meta_title: &format!("Summary: {} - Feedback Forms", escape_html(&form.title)),
        page_heading: &escape_html(&form.title),
        subtitle: Cow::Owned(subtitle),
        header_action_html: Cow::Borrowed(r#"<a class="back-link" href="/">← All forms</a>"#),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
        body_scripts: Vec::new(),
    })
}

fn summary_panel(position: usize, summary: &QuestionSummary) -> String {
    let question = &summary.question;

    let details = match question.question_type {
        QuestionType::Rating => match summary.avg_rating {
            Some(avg) => format!("<p>Average rating: <strong>{avg:.2}</strong> / 5</p>"),
            None => r#"<p class="empty">No ratings yet.</p>"#.to_string(),
        },
        QuestionType::MultipleChoice => {
            if summary.choice_counts.is_empty() {
                r#"<p class="empty">No answers yet.</p>"#.to_string()
            } else {
                let rows: String = summary
                    .choice_counts
                    .iter()
                    .map(|(choice, count)| {
                        format!(
                            "<tr><td>{}</td><td>{count}</td></tr>",
                            escape_html(choice),
                        )
                    })
                    .collect();
                format!(
                    "<table><thead><tr><th>Choice</th><th>Answers</th></tr></thead><tbody>{rows}</tbody></table>"
                )
            }
        }
        QuestionType::ShortText | QuestionType::LongText => {
            if summary.text_responses.is_empty() {
                r#"<p class="empty">No answers yet.</p>"#.to_string()
            } else {
                let items: String = summary
                    .text_responses
                    .iter()
                    .map(|text| format!("<li>{}</li>", escape_html(text)))
                    .collect();
                format!("<ul>{items}</ul>")
            }
        }
    };

    format!(
        r#"<section class="panel">
            <h2>{position}. {text}</h2>
            <p class="meta"><span class="type-tag">{type_label}</span> {count} answered</p>
            {details}
        </section>"#,
        text = escape_html(&question.question_text),
        type_label = question.question_type.label(),
        count = summary.count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{
        models::{AnswerValue, QuestionDraft, RespondentInfo},
        schema,
    };
    use sqlx::{
        SqlitePool,
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    };
    use tempfile::TempDir;

    async fn test_pool() -> (SqlitePool, TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("feedback.db"))
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .expect("open database");
        schema::ensure_schema(&pool).await.expect("create schema");
        (pool, dir)
    }

    fn anonymous() -> RespondentInfo {
        RespondentInfo {
            is_anonymous: true,
            name: None,
            email: None,
        }
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[5, 3]), Some(4.0));
        assert_eq!(average_rating(&[4, 4, 5]), Some(4.33));
        assert_eq!(average_rating(&[1, 2]), Some(1.5));
    }

    #[test]
    fn tallies_keep_first_seen_order() {
        let choices: Vec<String> = ["Yes", "No", "Yes", "Maybe", "No", "Yes"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            tally_choices(&choices),
            vec![
                ("Yes".to_string(), 3),
                ("No".to_string(), 2),
                ("Maybe".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn summarizes_ratings_and_texts_for_event_x() {
        let (pool, _dir) = test_pool().await;
        let drafts = vec![
            QuestionDraft {
                text: "How would you rate Event X?".to_string(),
                question_type: QuestionType::Rating,
                options: None,
                is_required: true,
            },
            QuestionDraft {
                text: "Any comments?".to_string(),
                question_type: QuestionType::ShortText,
                options: None,
                is_required: false,
            },
        ];
        let form_id = data::insert_form_with_questions(&pool, "Event X", None, &drafts)
            .await
            .expect("insert form");
        let questions = data::fetch_questions(&pool, form_id).await.expect("questions");
        let (rating_q, text_q) = (questions[0].id, questions[1].id);

        // Response A: rating 5, optional text left blank.
        data::insert_response(
            &pool,
            form_id,
            &anonymous(),
            &[
                (rating_q, AnswerValue::Rating(5)),
                (text_q, AnswerValue::Text(String::new())),
            ],
        )
        .await
        .expect("response A");
        // Response B: rating 3, text "Great".
        data::insert_response(
            &pool,
            form_id,
            &anonymous(),
            &[
                (rating_q, AnswerValue::Rating(3)),
                (text_q, AnswerValue::Text("Great".to_string())),
            ],
        )
        .await
        .expect("response B");

        let mut conn = pool.acquire().await.expect("acquire");
        assert_eq!(
            data::count_responses(&mut conn, form_id).await.expect("count"),
            2
        );

        let summaries = build_summaries(&mut conn, &questions).await.expect("summaries");
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].avg_rating, Some(4.0));
        assert_eq!(summaries[1].count, 1);
        assert_eq!(summaries[1].text_responses, vec!["Great".to_string()]);
        assert_eq!(summaries[1].avg_rating, None);
    }

    #[tokio::test]
    async fn counts_choices_across_responses() {
        let (pool, _dir) = test_pool().await;
        let drafts = vec![QuestionDraft {
            text: "Would you attend again?".to_string(),
            question_type: QuestionType::MultipleChoice,
            options: Some("Yes; No".to_string()),
            is_required: true,
        }];
        let form_id = data::insert_form_with_questions(&pool, "Event X", None, &drafts)
            .await
            .expect("insert form");
        let questions = data::fetch_questions(&pool, form_id).await.expect("questions");
        let choice_q = questions[0].id;

        for answer in ["Yes", "Yes", "No"] {
            data::insert_response(
                &pool,
                form_id,
                &anonymous(),
                &[(choice_q, AnswerValue::Text(answer.to_string()))],
            )
            .await
            .expect("insert response");
        }

        let mut conn = pool.acquire().await.expect("acquire");
        let summaries = build_summaries(&mut conn, &questions).await.expect("summaries");

        assert_eq!(summaries[0].count, 3);
        assert_eq!(
            summaries[0].choice_counts,
            vec![("Yes".to_string(), 2), ("No".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn summaries_are_stable_without_new_submissions() {
        let (pool, _dir) = test_pool().await;
        let drafts = vec![QuestionDraft {
            text: "How was it?".to_string(),
            question_type: QuestionType::Rating,
            options: None,
            is_required: true,
        }];
        let form_id = data::insert_form_with_questions(&pool, "Event X", None, &drafts)
            .await
            .expect("insert form");
        let questions = data::fetch_questions(&pool, form_id).await.expect("questions");

        data::insert_response(
            &pool,
            form_id,
            &anonymous(),
            &[(questions[0].id, AnswerValue::Rating(4))],
        )
        .await
        .expect("insert response");

        let mut conn = pool.acquire().await.expect("acquire");
        let first = build_summaries(&mut conn, &questions).await.expect("first pass");
        let second = build_summaries(&mut conn, &questions).await.expect("second pass");
        assert_eq!(first, second);
    }
}
