//! Notification dispatcher
//!
//! Background consumer of the event bus, spawned once at startup and living
//! for the whole process, not for any single request. Fires a short text
//! through the notify channel for every recorded response. Every failure on
//! this path is caught, logged, and discarded: this channel trades delivery
//! reliability for zero coupling to the submission path.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use canvass_common::events::SurveyEvent;

use crate::channels::NotifyChannel;

/// Consume survey events and dispatch notifications until the bus closes.
///
/// - `Lagged` means the channel buffer overflowed; the skipped notifications
///   are lost by design (best-effort channel)
/// - `Closed` means every sender dropped; the task shuts down
pub async fn run_notifier(
    mut rx: broadcast::Receiver<SurveyEvent>,
    channel: Option<Arc<dyn NotifyChannel>>,
) {
    debug!("Notification dispatcher started");

    loop {
        match rx.recv().await {
            Ok(SurveyEvent::ResponseRecorded {
                survey_title,
                respondent_name,
                respondent_phone,
                ..
            }) => {
                let Some(channel) = channel.as_ref() else {
                    debug!("Notification channel not configured; dropping notification");
                    continue;
                };

                let text =
                    format_response_summary(&survey_title, &respondent_name, &respondent_phone);
                if let Err(e) = channel.send_text(&text).await {
                    // Never propagates: the submission already succeeded
                    warn!("Notification delivery failed (ignored): {}", e);
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Notification dispatcher lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Event bus closed, notification dispatcher shutting down");
                break;
            }
        }
    }
}

/// Short text summary for one recorded response
fn format_response_summary(survey_title: &str, name: &str, phone: &str) -> String {
    format!(
        "New response to \"{}\" from {} ({})",
        survey_title,
        name,
        mask_phone(phone)
    )
}

/// Mask a phone number down to its last four digits
///
/// The notify channel may be a shared group chat; the full value stays in
/// the admin-facing report only.
fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("***{}", tail)
}
