//! Link extraction from the watched listing page.
//!
//! Fetches the page with a bounded GET, scans the card containers for
//! anchors, and keeps the ones that look like articles on the watched site.
//! A transport failure is not fatal (the run just sees no links); a page that
//! loads but yields nothing is reported as `ExtractError::Structural`.

mod filter;
mod parse;

pub use filter::{contains_sponsor_keyword, looks_like_article_link, normalize_href};
pub use parse::collect_card_links;

use std::time::Duration;

use crate::config::WatchConfig;
use crate::http;

/// What to scrape and which anchors to admit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRules {
    pub target_url: String,
    pub site_prefix: String,
    pub section_marker: String,
    pub card_selector: String,
    pub sponsor_keywords: Vec<String>,
}

impl ExtractRules {
    pub fn from_config(cfg: &WatchConfig) -> Self {
        Self {
            target_url: cfg.target_url.clone(),
            site_prefix: cfg.site_prefix.clone(),
            section_marker: cfg.section_marker.clone(),
            card_selector: cfg.card_selector.clone(),
            sponsor_keywords: cfg.sponsor_keywords.clone(),
        }
    }
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::from_config(&WatchConfig::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The page loaded but no admissible link was found in card containers.
    #[error("page structure changed: {reason}")]
    Structural { reason: String },
    #[error("invalid card selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
    #[error("invalid target URL `{url}`: {source}")]
    TargetUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Result of one extraction attempt that did not hit a fatal condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Current article links, in the order the source reports them.
    Links(Vec<String>),
    /// The page could not be fetched; already logged.
    FetchFailed,
}

impl ExtractOutcome {
    pub fn into_links(self) -> Vec<String> {
        match self {
            ExtractOutcome::Links(links) => links,
            ExtractOutcome::FetchFailed => Vec::new(),
        }
    }
}

/// Source of the current candidate links.
pub trait LinkSource {
    fn current_links(&self) -> Result<ExtractOutcome, ExtractError>;
}

/// Scrapes the configured listing page over HTTP.
#[derive(Debug, Clone)]
pub struct PageLinkSource {
    rules: ExtractRules,
    timeout: Duration,
}

impl PageLinkSource {
    pub fn new(rules: ExtractRules, timeout: Duration) -> Self {
        Self { rules, timeout }
    }

    pub fn from_config(cfg: &WatchConfig) -> Self {
        Self::new(ExtractRules::from_config(cfg), cfg.fetch_timeout())
    }

    pub fn rules(&self) -> &ExtractRules {
        &self.rules
    }
}

impl LinkSource for PageLinkSource {
    fn current_links(&self) -> Result<ExtractOutcome, ExtractError> {
        let url = &self.rules.target_url;
        let response = match http::get(url, self.timeout) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url = %url, timed_out = e.is_timeout(), "failed to fetch listing page: {}", e);
                return Ok(ExtractOutcome::FetchFailed);
            }
        };
        let links = collect_card_links(&response.text(), &self.rules)?;
        tracing::info!(url = %url, count = links.len(), "extracted article links");
        Ok(ExtractOutcome::Links(links))
    }
}
