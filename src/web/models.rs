use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// The fixed set of question types a form can use. Not extensible at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionType {
    ShortText,
    LongText,
    MultipleChoice,
    Rating,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::ShortText,
        QuestionType::LongText,
        QuestionType::MultipleChoice,
        QuestionType::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::MultipleChoice => "multiple_choice",
            Self::Rating => "rating",
        }
    }

    /// Human-readable label used on the authoring and summary pages.
    pub fn label(self) -> &'static str {
        match self {
            Self::ShortText => "Short Text",
            Self::LongText => "Long Text",
            Self::MultipleChoice => "Multiple Choice (single)",
            Self::Rating => "Rating (1-5)",
        }
    }
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct FormRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub form_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Option<String>,
    pub is_required: bool,
    pub sort_order: i64,
}

impl QuestionRow {
    /// Choice labels for a multiple-choice question. Options are stored as a
    /// single semicolon- or comma-delimited string.
    pub fn choice_options(&self) -> Vec<String> {
        self.options.as_deref().map(split_options).unwrap_or_default()
    }
}

pub fn split_options(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct ResponseRow {
    pub id: i64,
    pub form_id: i64,
    pub submitted_at: DateTime<Utc>,
    pub is_anonymous: bool,
    pub respondent_name: Option<String>,
    pub respondent_email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct AnswerRow {
    pub id: i64,
    pub response_id: i64,
    pub question_id: i64,
    pub answer_text: Option<String>,
    pub rating_value: Option<i64>,
}

/// A recorded value for one question within a submission. Exactly one of the
/// two answer columns is populated per row; the variant makes that structural
/// rather than conventional.
#[derive(Clone, Debug, PartialEq)]
pub enum AnswerValue {
    Text(String),
    Rating(i64),
}

impl AnswerValue {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Rating(_) => None,
        }
    }

    pub fn rating(&self) -> Option<i64> {
        match self {
            Self::Text(_) => None,
            Self::Rating(value) => Some(*value),
        }
    }
}

/// A question as collected from the authoring page, before it has an id.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionDraft {
    pub text: String,
    pub question_type: QuestionType,
    pub options: Option<String>,
    pub is_required: bool,
}

/// Respondent identity attached to a submission. When anonymous, name and
/// email are absent regardless of what was submitted.
#[derive(Clone, Debug, PartialEq)]
pub struct RespondentInfo {
    pub is_anonymous: bool,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_options_on_semicolons_and_commas() {
        assert_eq!(split_options("Yes; No; Maybe"), vec!["Yes", "No", "Maybe"]);
        assert_eq!(split_options("Red,Green , Blue"), vec!["Red", "Green", "Blue"]);
        assert_eq!(split_options("Solo"), vec!["Solo"]);
        assert_eq!(split_options(" ; ;; "), Vec::<String>::new());
    }

    #[test]
    fn answer_value_populates_exactly_one_column() {
        let text = AnswerValue::Text("Great".to_string());
        assert_eq!(text.text(), Some("Great"));
        assert_eq!(text.rating(), None);

        let rating = AnswerValue::Rating(4);
        assert_eq!(rating.text(), None);
        assert_eq!(rating.rating(), Some(4));
    }
}
