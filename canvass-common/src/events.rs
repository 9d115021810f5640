//! Event types and event bus for the Canvass service
//!
//! Response intake publishes a `ResponseRecorded` event after the store write
//! commits; the notification dispatcher consumes it from a background task
//! that outlives the originating request. Publishing never blocks and never
//! fails the publisher: with no subscribers the event is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by the survey service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurveyEvent {
    /// A response was persisted successfully
    ResponseRecorded {
        response_id: Uuid,
        survey_id: Uuid,
        survey_title: String,
        respondent_name: String,
        respondent_phone: String,
        timestamp: DateTime<Utc>,
    },

    /// A survey and its responses were deleted
    SurveyDeleted {
        survey_id: Uuid,
        responses_removed: u64,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast bus for survey events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SurveyEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurveyEvent> {
        self.tx.subscribe()
    }

    /// Emit an event; returns the subscriber count that received it
    ///
    /// A bus with no subscribers drops the event silently. The publisher's
    /// outcome never depends on delivery.
    pub fn emit(&self, event: SurveyEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
