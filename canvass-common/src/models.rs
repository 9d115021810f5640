//! Domain records for surveys and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Question kind, stored as a lowercase string in the questions JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free-form text answer
    Text,
    /// Single choice from `options`
    Choice,
    /// Numeric rating
    Rating,
    /// Dropdown selection from `options`
    Dropdown,
}

/// One question within a survey
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Question label; also the join key answers reference
    pub text: String,
    pub kind: QuestionKind,
    /// Option labels; meaningful only for choice/dropdown kinds
    #[serde(default)]
    pub options: Vec<String>,
}

/// A survey schema administered to respondents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// One answer within a response
///
/// `question_text` is matched against `Question::text` by exact equality at
/// report-compile time; it is not an identity reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "questionText")]
    pub question_text: String,
    pub value: String,
}

/// One respondent's submitted answers to a survey
///
/// Immutable after creation; `submitted_at` is server-assigned at insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub name: String,
    pub phone: String,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
}

/// Survey list entry without the questions payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
