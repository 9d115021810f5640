//! Survey CRUD API handlers (admin surface)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use canvass_common::db;
use canvass_common::events::SurveyEvent;
use canvass_common::models::{Question, QuestionKind, Survey, SurveySummary};
use canvass_common::Error;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/surveys and PUT /api/surveys/:id request body
#[derive(Debug, Deserialize)]
pub struct SurveyRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// DELETE /api/surveys/:id response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurveyResponse {
    pub survey_id: Uuid,
    pub responses_removed: u64,
}

/// POST /api/surveys
///
/// Create a new survey. Returns 201 with the stored record.
pub async fn create_survey(
    State(state): State<AppState>,
    Json(request): Json<SurveyRequest>,
) -> ApiResult<(StatusCode, Json<Survey>)> {
    validate_survey_request(&request)?;

    let survey = db::surveys::insert_survey(
        &state.db,
        request.title.trim().to_string(),
        request.description,
        request.questions,
    )
    .await?;

    tracing::info!(survey_id = %survey.id, title = %survey.title, "Survey created");
    Ok((StatusCode::CREATED, Json(survey)))
}

/// GET /api/surveys
///
/// List all surveys newest-first, without the questions payload.
pub async fn list_surveys(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SurveySummary>>> {
    let summaries = db::surveys::list_surveys(&state.db).await?;
    Ok(Json(summaries))
}

/// GET /api/surveys/:id
///
/// Fetch one survey with questions; respondents load this to fill the form.
pub async fn get_survey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Survey>> {
    let survey_id = parse_survey_id(&id)?;
    let survey = db::surveys::get_survey(&state.db, survey_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No survey with id {}", survey_id)))?;
    Ok(Json(survey))
}

/// PUT /api/surveys/:id
///
/// Replace a survey's title, description, and questions.
pub async fn update_survey(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SurveyRequest>,
) -> ApiResult<Json<Survey>> {
    let survey_id = parse_survey_id(&id)?;
    validate_survey_request(&request)?;

    let updated = db::surveys::update_survey(
        &state.db,
        survey_id,
        request.title.trim().to_string(),
        request.description,
        request.questions,
    )
    .await?
    .ok_or_else(|| Error::NotFound(format!("No survey with id {}", survey_id)))?;

    tracing::info!(survey_id = %survey_id, "Survey updated");
    Ok(Json(updated))
}

/// DELETE /api/surveys/:id
///
/// Delete a survey and every response referencing it (one unit of work).
pub async fn delete_survey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteSurveyResponse>> {
    let survey_id = parse_survey_id(&id)?;

    let responses_removed = db::surveys::delete_survey_cascade(&state.db, survey_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No survey with id {}", survey_id)))?;

    tracing::info!(
        survey_id = %survey_id,
        responses_removed,
        "Survey deleted with responses"
    );

    state.events.emit(SurveyEvent::SurveyDeleted {
        survey_id,
        responses_removed,
        timestamp: Utc::now(),
    });

    Ok(Json(DeleteSurveyResponse {
        survey_id,
        responses_removed,
    }))
}

/// Parse a survey id path segment; malformed ids are 400, not 404
pub(crate) fn parse_survey_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("Malformed survey id: {}", id)))
}

fn validate_survey_request(request: &SurveyRequest) -> Result<(), ApiError> {
    if request.title.trim().is_empty() {
        return Err(Error::InvalidInput("Survey title must not be empty".to_string()).into());
    }
    for question in &request.questions {
        if question.text.trim().is_empty() {
            return Err(
                Error::InvalidInput("Question text must not be empty".to_string()).into(),
            );
        }
        let needs_options = matches!(
            question.kind,
            QuestionKind::Choice | QuestionKind::Dropdown
        );
        if needs_options && question.options.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Question \"{}\" needs at least one option",
                question.text
            ))
            .into());
        }
    }
    Ok(())
}
