use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the webhook endpoint.
pub const WEBHOOK_ENV_VAR: &str = "SLACK_BOOKREVIEW_WEBHOOK_URL";

pub const DEFAULT_TARGET_URL: &str = "https://www.lifehacker.jp/regular/regular_book_to_read/";
pub const DEFAULT_SITE_PREFIX: &str = "https://www.lifehacker.jp/";
pub const DEFAULT_SECTION_MARKER: &str = "regular_book_to_read";
pub const DEFAULT_CARD_SELECTOR: &str = r#"[class*="articles_pArticles_Cards"]"#;
pub const DEFAULT_STATE_PATH: &str = "data/known_urls.json";
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Global configuration loaded from `~/.config/awatch/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Listing page that is scraped for article links.
    pub target_url: String,
    /// Every admitted article URL must start with this prefix.
    pub site_prefix: String,
    /// Path fragment identifying the watched section (alternative to `/article/`).
    pub section_marker: String,
    /// CSS selector for the card containers that hold article anchors.
    pub card_selector: String,
    /// Anchors whose visible text contains any of these (case-insensitive) are skipped.
    pub sponsor_keywords: Vec<String>,
    /// JSON file with the already-notified URLs. Relative paths resolve against the working directory.
    pub state_path: PathBuf,
    /// Total timeout for the listing GET, in seconds.
    pub fetch_timeout_secs: u64,
    /// Total timeout for each webhook POST, in seconds.
    pub notify_timeout_secs: u64,
    /// Webhook endpoint used when the environment variable is unset.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// key=value file consulted before reading the environment variable.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            site_prefix: DEFAULT_SITE_PREFIX.to_string(),
            section_marker: DEFAULT_SECTION_MARKER.to_string(),
            card_selector: DEFAULT_CARD_SELECTOR.to_string(),
            sponsor_keywords: vec!["sponsored".to_string(), "sponsored by".to_string()],
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            fetch_timeout_secs: 10,
            notify_timeout_secs: 5,
            webhook_url: None,
            env_file: None,
        }
    }
}

impl WatchConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }

    pub fn env_file_path(&self) -> &Path {
        self.env_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_ENV_FILE))
    }

    /// Resolve the webhook endpoint: environment variable, then the same key in
    /// the env file, then `webhook_url`. Blank values count as unset.
    pub fn resolve_webhook_url(&self) -> Option<String> {
        non_blank(std::env::var(WEBHOOK_ENV_VAR).ok())
            .or_else(|| non_blank(env_file_value(self.env_file_path(), WEBHOOK_ENV_VAR)))
            .or_else(|| non_blank(self.webhook_url.clone()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Look up `key` in a key=value env file. A missing file yields `None`; the
/// process environment is left untouched.
pub fn env_file_value(path: &Path, key: &str) -> Option<String> {
    if !path.exists() {
        return None;
    }
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            tracing::warn!("could not read env file {}: {}", path.display(), e);
            return None;
        }
    };
    for item in iter {
        match item {
            Ok((k, v)) if k == key => return Some(v),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("skipping malformed line in {}: {}", path.display(), e);
            }
        }
    }
    None
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("awatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<WatchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: WatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
