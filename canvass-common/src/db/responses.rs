//! Response table operations, including the duplicate guard

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::surveys::{parse_timestamp, parse_uuid};
use crate::models::{Answer, SurveyResponse};
use crate::{Error, Result};

/// Persist a response, admitting at most one per (survey, phone) key.
///
/// The INSERT itself is the duplicate guard: the `UNIQUE(survey_id, phone)`
/// constraint serializes concurrent writers inside the store, so exactly one
/// of N racing submissions succeeds regardless of handler interleaving. A
/// constraint violation maps to [`Error::Conflict`]; there is deliberately no
/// exists-first check, which would reintroduce the time-of-check race.
pub async fn insert_response(pool: &SqlitePool, response: &SurveyResponse) -> Result<()> {
    let answers_json = serde_json::to_string(&response.answers)
        .map_err(|e| Error::Internal(format!("Failed to serialize answers: {}", e)))?;

    let result = sqlx::query(
        r#"
        INSERT INTO responses (guid, survey_id, name, phone, answers, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(response.id.to_string())
    .bind(response.survey_id.to_string())
    .bind(&response.name)
    .bind(&response.phone)
    .bind(&answers_json)
    .bind(response.submitted_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(Error::Conflict(format!(
                "Phone {} already submitted a response to survey {}",
                response.phone, response.survey_id
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Load all responses for a survey, sorted by submission time ascending
pub async fn list_for_survey(pool: &SqlitePool, survey_id: Uuid) -> Result<Vec<SurveyResponse>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, survey_id, name, phone, answers, submitted_at
        FROM responses
        WHERE survey_id = ?
        ORDER BY submitted_at ASC
        "#,
    )
    .bind(survey_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let answers: String = row.get("answers");
            let answers: Vec<Answer> = serde_json::from_str(&answers)
                .map_err(|e| Error::Internal(format!("Failed to deserialize answers: {}", e)))?;

            Ok(SurveyResponse {
                id: parse_uuid(row.get("guid"))?,
                survey_id: parse_uuid(row.get("survey_id"))?,
                name: row.get("name"),
                phone: row.get("phone"),
                answers,
                submitted_at: parse_timestamp(row.get("submitted_at"))?,
            })
        })
        .collect()
}

/// Count responses recorded for a survey
pub async fn count_for_survey(pool: &SqlitePool, survey_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM responses WHERE survey_id = ?")
        .bind(survey_id.to_string())
        .fetch_one(pool)
        .await?;

    Ok(count)
}
