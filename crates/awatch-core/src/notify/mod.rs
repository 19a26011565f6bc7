//! Webhook notifications: one message per new article, plus an error report.

mod payload;

pub use payload::WebhookPayload;

use std::time::Duration;

use crate::http::{self, HttpError};

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook is not configured: set SLACK_BOOKREVIEW_WEBHOOK_URL (environment or .env) or webhook_url in config.toml")]
    Unconfigured,
    #[error("encode webhook payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("webhook delivery failed: {0}")]
    Delivery(#[from] HttpError),
}

/// Sink for run notifications. Both calls must fail loudly; callers abort on error.
pub trait Notifier {
    fn notify(&self, url: &str) -> Result<(), NotifyError>;
    fn notify_error(&self, reason: &str) -> Result<(), NotifyError>;
}

/// Posts JSON payloads to an incoming-webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    webhook_url: Option<String>,
    timeout: Duration,
}

impl WebhookNotifier {
    /// `webhook_url = None` is allowed here; the first send reports `Unconfigured`.
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Self {
        Self {
            webhook_url,
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub fn send(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let url = self.webhook_url.as_deref().ok_or(NotifyError::Unconfigured)?;
        let body = serde_json::to_vec(payload)?;
        http::post_json(url, &body, self.timeout)?;
        Ok(())
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, url: &str) -> Result<(), NotifyError> {
        self.send(&WebhookPayload::new_article(url))
    }

    fn notify_error(&self, reason: &str) -> Result<(), NotifyError> {
        self.send(&WebhookPayload::extraction_error(reason))
    }
}
