//! Report delivery pipeline
//!
//! Compiles accumulated responses into a tabular report, serializes it to an
//! xlsx artifact, and pushes it through the configured delivery channel.
//! Synchronous end-to-end: the admin-facing caller blocks until delivery
//! succeeds or a terminal error is returned, and every failure on this path
//! is caller-visible (the deliberate asymmetry with the notification
//! dispatcher).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use canvass_common::db;
use canvass_common::report::{self, TabularReport};
use canvass_common::{Error, Result};

use crate::channels::{DeliveryChannel, ReportAttachment};

/// Worksheet name inside the generated workbook
const SHEET_NAME: &str = "Responses";

/// Acknowledgement returned to the administrator once delivery completes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub survey_id: Uuid,
    pub responses_delivered: usize,
    pub filename: String,
}

/// Compile and deliver the report for one survey.
///
/// Fails fast with `EmptyReport` before any compilation or external call
/// when the survey has no responses; `Config` when no delivery channel is
/// configured; `Transport`/`Timeout` when the channel call fails.
pub async fn deliver(
    db: &SqlitePool,
    channel: Option<&Arc<dyn DeliveryChannel>>,
    survey_id: Uuid,
) -> Result<DeliveryReceipt> {
    let survey = db::surveys::get_survey(db, survey_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No survey with id {}", survey_id)))?;

    let responses = db::responses::list_for_survey(db, survey_id).await?;
    if responses.is_empty() {
        return Err(Error::EmptyReport(format!(
            "Survey \"{}\" has no responses yet",
            survey.title
        )));
    }

    let channel = channel.ok_or_else(|| {
        Error::Config("No delivery channel configured (telegram credentials unset)".to_string())
    })?;

    let compiled = report::compile(&survey, &responses);
    let artifact = report_to_xlsx(&compiled)?;
    let filename = report_filename(&survey.title, Utc::now());

    info!(
        survey_id = %survey_id,
        responses = responses.len(),
        filename = %filename,
        "Report compiled, dispatching"
    );

    channel
        .send_report(ReportAttachment {
            filename: filename.clone(),
            caption: format!(
                "Survey report: {} ({} responses attached)",
                survey.title,
                responses.len()
            ),
            bytes: artifact,
        })
        .await?;

    info!(survey_id = %survey_id, "Report delivered");

    Ok(DeliveryReceipt {
        survey_id,
        responses_delivered: responses.len(),
        filename,
    })
}

/// Serialize a compiled report to an in-memory xlsx workbook
pub fn report_to_xlsx(report: &TabularReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(SHEET_NAME)
        .map_err(|e| Error::Internal(format!("Failed to name worksheet: {}", e)))?;

    let header_format = Format::new().set_bold();
    for (col, header) in report.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| Error::Internal(format!("Failed to write header cell: {}", e)))?;
    }

    for (row, cells) in report.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            sheet
                .write_string((row + 1) as u32, col as u16, cell)
                .map_err(|e| Error::Internal(format!("Failed to write cell: {}", e)))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| Error::Internal(format!("Failed to serialize workbook: {}", e)))
}

/// Attachment filename: sanitized survey title plus a UTC timestamp
fn report_filename(title: &str, at: DateTime<Utc>) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.xlsx", sanitized, at.format("%Y%m%d%H%M%S"))
}
