//! Telegram Bot API channel
//!
//! Implements both channel traits over the Bot API: `sendMessage` for short
//! notification texts, `sendDocument` (multipart) for report attachments.
//!
//! # API Reference
//! - https://core.telegram.org/bots/api#sendmessage
//! - https://core.telegram.org/bots/api#senddocument

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use canvass_common::config::TelegramConfig;
use canvass_common::{Error, Result};

use super::{DeliveryChannel, NotifyChannel, ReportAttachment};

/// Telegram Bot API base URL
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Default timeout for Bot API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Mime type of the xlsx report artifact
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Minimal Bot API response envelope
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Telegram channel for notifications and report delivery
pub struct TelegramChannel {
    http_client: Client,
    bot_token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Self {
        Self::with_api_base(config, TELEGRAM_API_BASE.to_string())
    }

    /// Construct against a non-default API base (used by tests)
    pub fn with_api_base(config: &TelegramConfig, api_base: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            api_base,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    /// Map a reqwest failure to the error taxonomy
    fn transport_error(context: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("{} timed out: {}", context, e))
        } else {
            Error::Transport(format!("{} failed: {}", context, e))
        }
    }

    /// Check the Bot API envelope of a completed call
    async fn check_response(context: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        let body: BotApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("{}: unreadable response: {}", context, e)))?;

        if !status.is_success() || !body.ok {
            return Err(Error::Transport(format!(
                "{}: Bot API returned {} ({})",
                context,
                status,
                body.description.unwrap_or_else(|| "no description".to_string())
            )));
        }

        debug!("{} succeeded", context);
        Ok(())
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    async fn send_text(&self, text: &str) -> Result<()> {
        let response = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| Self::transport_error("sendMessage", e))?;

        Self::check_response("sendMessage", response).await
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    async fn send_report(&self, attachment: ReportAttachment) -> Result<()> {
        let document = multipart::Part::bytes(attachment.bytes)
            .file_name(attachment.filename)
            .mime_str(XLSX_MIME)
            .map_err(|e| Error::Internal(format!("Invalid attachment mime type: {}", e)))?;

        let form = multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", attachment.caption)
            .part("document", document);

        let response = self
            .http_client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::transport_error("sendDocument", e))?;

        Self::check_response("sendDocument", response).await
    }
}
