//! Webhook message bodies (Slack incoming-webhook shape).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub text: String,
    pub unfurl_links: bool,
    pub unfurl_media: bool,
}

impl WebhookPayload {
    /// Announcement for a newly published article; link previews on.
    pub fn new_article(url: &str) -> Self {
        Self {
            text: format!("🆕 新しい書評記事が公開されました！\n{}", url),
            unfurl_links: true,
            unfurl_media: true,
        }
    }

    /// Extraction failure report; link previews off.
    pub fn extraction_error(reason: &str) -> Self {
        Self {
            text: format!(
                ":warning: 書評一覧ページから記事リンクを取得できませんでした。\n{}",
                reason
            ),
            unfurl_links: false,
            unfurl_media: false,
        }
    }
}
