//! Report export API handler (admin surface)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::surveys::parse_survey_id;
use crate::error::ApiResult;
use crate::services::delivery::{self, DeliveryReceipt};
use crate::AppState;

/// POST /api/surveys/:id/export
///
/// Compile the survey's responses into a report and push it through the
/// configured delivery channel. Blocks until delivery succeeds or a terminal
/// error is returned: 404 unknown survey; 400 when no responses exist; 500
/// when the channel is unconfigured; 502/504 when the channel call fails or
/// times out.
pub async fn export_survey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeliveryReceipt>> {
    let survey_id = parse_survey_id(&id)?;
    let receipt = delivery::deliver(&state.db, state.delivery.as_ref(), survey_id).await?;
    Ok(Json(receipt))
}
