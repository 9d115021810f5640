//! Survey table operations

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{Question, Survey, SurveySummary};
use crate::{Error, Result};

/// Insert a new survey with a server-assigned id and creation time
pub async fn insert_survey(
    pool: &SqlitePool,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
) -> Result<Survey> {
    let survey = Survey {
        id: Uuid::new_v4(),
        title,
        description,
        questions,
        created_at: Utc::now(),
    };

    let questions_json = serde_json::to_string(&survey.questions)
        .map_err(|e| Error::Internal(format!("Failed to serialize questions: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO surveys (guid, title, description, questions, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(survey.id.to_string())
    .bind(&survey.title)
    .bind(&survey.description)
    .bind(&questions_json)
    .bind(survey.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(survey)
}

/// Load one survey with its questions
pub async fn get_survey(pool: &SqlitePool, survey_id: Uuid) -> Result<Option<Survey>> {
    let row = sqlx::query(
        "SELECT guid, title, description, questions, created_at FROM surveys WHERE guid = ?",
    )
    .bind(survey_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(parse_survey_row).transpose()
}

/// List all surveys newest-first, without the questions payload
pub async fn list_surveys(pool: &SqlitePool) -> Result<Vec<SurveySummary>> {
    let rows = sqlx::query(
        "SELECT guid, title, description, created_at FROM surveys ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            Ok(SurveySummary {
                id: parse_uuid(row.get("guid"))?,
                title: row.get("title"),
                description: row.get("description"),
                created_at: parse_timestamp(row.get("created_at"))?,
            })
        })
        .collect()
}

/// Replace a survey's title, description, and questions
///
/// Returns the updated survey, or `None` if no survey has that id.
pub async fn update_survey(
    pool: &SqlitePool,
    survey_id: Uuid,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
) -> Result<Option<Survey>> {
    let questions_json = serde_json::to_string(&questions)
        .map_err(|e| Error::Internal(format!("Failed to serialize questions: {}", e)))?;

    let result = sqlx::query(
        "UPDATE surveys SET title = ?, description = ?, questions = ? WHERE guid = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(&questions_json)
    .bind(survey_id.to_string())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_survey(pool, survey_id).await
}

/// Delete a survey and every response referencing it as one unit of work
///
/// The store enforces no referential integrity between the two tables, so
/// the cascade is explicit: responses first, then the survey, inside a
/// single transaction. The response delete is idempotent by key, so a retry
/// after a failed transaction converges.
///
/// Returns the number of responses removed, or `None` if no survey has
/// that id (in which case nothing is deleted).
pub async fn delete_survey_cascade(pool: &SqlitePool, survey_id: Uuid) -> Result<Option<u64>> {
    let id = survey_id.to_string();
    let mut tx = pool.begin().await?;

    let responses_removed = sqlx::query("DELETE FROM responses WHERE survey_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let surveys_removed = sqlx::query("DELETE FROM surveys WHERE guid = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if surveys_removed == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(responses_removed))
}

fn parse_survey_row(row: sqlx::sqlite::SqliteRow) -> Result<Survey> {
    let questions: String = row.get("questions");
    let questions: Vec<Question> = serde_json::from_str(&questions)
        .map_err(|e| Error::Internal(format!("Failed to deserialize questions: {}", e)))?;

    Ok(Survey {
        id: parse_uuid(row.get("guid"))?,
        title: row.get("title"),
        description: row.get("description"),
        questions,
        created_at: parse_timestamp(row.get("created_at"))?,
    })
}

pub(crate) fn parse_uuid(value: String) -> Result<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|e| Error::Internal(format!("Failed to parse guid: {}", e)))
}

pub(crate) fn parse_timestamp(value: String) -> Result<chrono::DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse timestamp: {}", e)))
}
