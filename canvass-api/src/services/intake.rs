//! Response intake
//!
//! Validates and persists one submission, then publishes the recorded event
//! for the notification dispatcher. The caller's outcome and latency are
//! decided entirely by the store write; notification delivery happens on a
//! detached consumer and never feeds back into this path.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use canvass_common::db;
use canvass_common::events::{EventBus, SurveyEvent};
use canvass_common::models::{Answer, SurveyResponse};
use canvass_common::{Error, Result};

/// Submit one response.
///
/// Outcomes, in evaluation order:
/// - `InvalidInput` for a malformed name, phone, or answer entry
/// - `NotFound` when no survey has the given id
/// - `Conflict` when the (survey, phone) key already has a response
/// - the persisted record otherwise, with server-assigned id and timestamp
pub async fn submit_response(
    db: &SqlitePool,
    events: &EventBus,
    survey_id: Uuid,
    name: String,
    phone: String,
    answers: Vec<Answer>,
) -> Result<SurveyResponse> {
    let name = name.trim().to_string();
    let phone = phone.trim().to_string();
    validate_submission(&name, &phone, &answers)?;

    let survey = db::surveys::get_survey(db, survey_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No survey with id {}", survey_id)))?;

    let response = SurveyResponse {
        id: Uuid::new_v4(),
        survey_id,
        name,
        phone,
        answers,
        submitted_at: Utc::now(),
    };

    // The INSERT is the duplicate guard; Conflict surfaces from the store's
    // unique constraint, not from any pre-check here.
    db::responses::insert_response(db, &response).await?;

    info!(
        survey_id = %survey_id,
        response_id = %response.id,
        "Response recorded"
    );

    // Publish after the write commits so the dispatcher only ever sees
    // persisted responses. Emit never blocks and never fails the submitter.
    events.emit(SurveyEvent::ResponseRecorded {
        response_id: response.id,
        survey_id,
        survey_title: survey.title,
        respondent_name: response.name.clone(),
        respondent_phone: response.phone.clone(),
        timestamp: response.submitted_at,
    });

    Ok(response)
}

/// Validate submitter identity and answer entries
fn validate_submission(name: &str, phone: &str, answers: &[Answer]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("Name must not be empty".to_string()));
    }
    if phone.is_empty() {
        return Err(Error::InvalidInput("Phone must not be empty".to_string()));
    }
    if !is_plausible_phone(phone) {
        return Err(Error::InvalidInput(format!(
            "Phone is not a plausible phone number: {}",
            phone
        )));
    }
    for answer in answers {
        if answer.question_text.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Answer entry has empty question text".to_string(),
            ));
        }
        if answer.value.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Answer for \"{}\" has an empty value",
                answer.question_text
            )));
        }
    }
    Ok(())
}

/// Phone plausibility: optional leading `+`, digits with separator
/// characters, 7 to 15 digits total
fn is_plausible_phone(phone: &str) -> bool {
    let mut digits = 0usize;
    for (i, c) in phone.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '+' if i == 0 => {}
            '-' | ' ' | '(' | ')' => {}
            _ => return false,
        }
    }
    (7..=15).contains(&digits)
}
