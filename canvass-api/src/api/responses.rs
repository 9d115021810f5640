//! Response submission API handler (public surface)

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use canvass_common::models::Answer;
use canvass_common::Error;

use crate::error::ApiResult;
use crate::services::intake;
use crate::AppState;

/// POST /api/responses request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    pub survey_id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// POST /api/responses response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseResponse {
    pub response_id: Uuid,
    pub survey_id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

/// POST /api/responses
///
/// Submit one response. 201 on success; 404 unknown survey; 409 duplicate
/// (survey, phone); 422 validation failure. The acknowledgement returns as
/// soon as the write commits - notification delivery happens on a detached
/// task and never affects this outcome.
pub async fn submit_response(
    State(state): State<AppState>,
    Json(request): Json<SubmitResponseRequest>,
) -> ApiResult<(StatusCode, Json<SubmitResponseResponse>)> {
    let survey_id = Uuid::parse_str(request.survey_id.trim()).map_err(|_| {
        Error::InvalidInput(format!("Malformed survey id: {}", request.survey_id))
    })?;

    let response = intake::submit_response(
        &state.db,
        &state.events,
        survey_id,
        request.name,
        request.phone,
        request.answers,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponseResponse {
            response_id: response.id,
            survey_id: response.survey_id,
            submitted_at: response.submitted_at,
        }),
    ))
}
