//! External channel abstractions
//!
//! Two transports with deliberately different failure policies sit behind
//! these traits: the notification channel (best-effort, failures logged and
//! dropped by the dispatcher) and the delivery channel (failures surfaced
//! verbatim to the calling administrator). The traits are the seam test
//! doubles substitute.

use async_trait::async_trait;
use canvass_common::Result;

pub mod telegram;

pub use telegram::TelegramChannel;

/// A compiled report ready for dispatch through a delivery channel
#[derive(Debug, Clone)]
pub struct ReportAttachment {
    /// Suggested filename for the attachment
    pub filename: String,
    /// Caption or subject text accompanying the attachment
    pub caption: String,
    /// Serialized report artifact
    pub bytes: Vec<u8>,
}

/// Side channel accepting a short text message
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// Delivery channel accepting a named binary attachment plus caption text
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send_report(&self, attachment: ReportAttachment) -> Result<()>;
}
