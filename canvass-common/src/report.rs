//! Report compilation
//!
//! Pure transform from (survey, responses) to tabular data. No I/O, no side
//! effects; callers own emptiness policy and response ordering.

use crate::models::{Survey, SurveyResponse};

/// Cell value rendered when a response carries no answer for a question
pub const NO_ANSWER: &str = "(no answer)";

/// Timestamp format for the submission-time column (UTC)
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compiled tabular report: one header row plus one row per response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularReport {
    /// Number of data rows (excludes the header)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Compile responses into a tabular report.
///
/// Column order is pinned by the survey schema: submission time, name, phone,
/// then one column per question in survey order. The order answers appear
/// within a response never affects the output. Row order equals input order;
/// callers supply responses sorted by submission time ascending for a
/// chronological report.
///
/// Per row, the answer whose question text exactly equals the question's
/// text fills the cell; a missing answer renders [`NO_ANSWER`]. Answers
/// matching no current question are ignored.
///
/// An empty response slice yields a header-only report.
pub fn compile(survey: &Survey, responses: &[SurveyResponse]) -> TabularReport {
    let mut headers = Vec::with_capacity(3 + survey.questions.len());
    headers.push("Submitted At".to_string());
    headers.push("Name".to_string());
    headers.push("Phone".to_string());
    headers.extend(survey.questions.iter().map(|q| q.text.clone()));

    let rows = responses
        .iter()
        .map(|response| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(response.submitted_at.format(TIME_FORMAT).to_string());
            row.push(response.name.clone());
            row.push(response.phone.clone());
            for question in &survey.questions {
                let cell = response
                    .answers
                    .iter()
                    .find(|a| a.question_text == question.text)
                    .map(|a| a.value.clone())
                    .unwrap_or_else(|| NO_ANSWER.to_string());
                row.push(cell);
            }
            row
        })
        .collect();

    TabularReport { headers, rows }
}
