use anyhow::Result;
use sqlx::{SqliteConnection, SqlitePool};

use super::models::{
    AnswerValue, FormRow, QuestionDraft, QuestionRow, QuestionType, RespondentInfo,
};

pub async fn fetch_forms(pool: &SqlitePool) -> sqlx::Result<Vec<FormRow>> {
    sqlx::query_as::<_, FormRow>(
        "SELECT id, title, description, created_at FROM forms
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_form(pool: &SqlitePool, form_id: i64) -> sqlx::Result<Option<FormRow>> {
    sqlx::query_as::<_, FormRow>(
        "SELECT id, title, description, created_at FROM forms WHERE id = ?1",
    )
    .bind(form_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_questions(pool: &SqlitePool, form_id: i64) -> sqlx::Result<Vec<QuestionRow>> {
    sqlx::query_as::<_, QuestionRow>(
        "SELECT id, form_id, question_text, question_type, options, is_required, sort_order
         FROM questions WHERE form_id = ?1 ORDER BY sort_order",
    )
    .bind(form_id)
    .fetch_all(pool)
    .await
}

/// Inserts a form and its questions as one unit: either every row is written
/// or none is. `sort_order` is the 1-based position within `questions`;
/// options are persisted only for multiple-choice questions.
pub async fn insert_form_with_questions(
    pool: &SqlitePool,
    title: &str,
    description: Option<&str>,
    questions: &[QuestionDraft],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let form_id = sqlx::query("INSERT INTO forms (title, description) VALUES (?1, ?2)")
        .bind(title)
        .bind(description)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    for (index, question) in questions.iter().enumerate() {
        let options = if question.question_type == QuestionType::MultipleChoice {
            question.options.as_deref()
        } else {
            None
        };

        sqlx::query(
            "INSERT INTO questions
                 (form_id, question_text, question_type, options, is_required, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(form_id)
        .bind(&question.text)
        .bind(question.question_type)
        .bind(options)
        .bind(question.is_required)
        .bind(index as i64 + 1)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(form_id)
}

/// Inserts one response row plus one answer row per recorded value, all in a
/// single transaction. Any failure aborts the whole submission with no
/// partial rows.
pub async fn insert_response(
    pool: &SqlitePool,
    form_id: i64,
    respondent: &RespondentInfo,
    answers: &[(i64, AnswerValue)],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let response_id = sqlx::query(
        "INSERT INTO responses (form_id, is_anonymous, respondent_name, respondent_email)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(form_id)
    .bind(respondent.is_anonymous)
    .bind(respondent.name.as_deref())
    .bind(respondent.email.as_deref())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for (question_id, value) in answers {
        sqlx::query(
            "INSERT INTO answers (response_id, question_id, answer_text, rating_value)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(response_id)
        .bind(*question_id)
        .bind(value.text())
        .bind(value.rating())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(response_id)
}

/// Deletes a form; cascade-delete removes its questions, responses, and
/// answers. Returns the number of form rows removed (0 when the id is
/// unknown).
pub async fn delete_form(pool: &SqlitePool, form_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM forms WHERE id = ?1")
        .bind(form_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_responses(conn: &mut SqliteConnection, form_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM responses WHERE form_id = ?1")
        .bind(form_id)
        .fetch_one(conn)
        .await
}

/// Recorded rating values for one question, in insertion order.
pub async fn fetch_question_ratings(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar::<_, i64>(
        "SELECT rating_value FROM answers
         WHERE question_id = ?1 AND rating_value IS NOT NULL",
    )
    .bind(question_id)
    .fetch_all(conn)
    .await
}

/// Non-empty recorded answer texts for one question, in insertion order.
pub async fn fetch_question_texts(
    conn: &mut SqliteConnection,
    question_id: i64,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        "SELECT answer_text FROM answers
         WHERE question_id = ?1 AND answer_text IS NOT NULL AND answer_text != ''",
    )
    .bind(question_id)
    .fetch_all(conn)
    .await
}
