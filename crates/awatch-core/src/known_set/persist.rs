//! Persist the known set as a JSON array of URLs (sorted, unique, pretty-printed).

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::KnownSet;

/// Whole-file JSON store for the known set. No locking; one writer per run.
#[derive(Debug, Clone)]
pub struct KnownSetStore {
    path: PathBuf,
}

impl KnownSetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the known set. A missing file is an empty set; an unreadable or
    /// malformed one is an error.
    pub fn load(&self) -> Result<KnownSet> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no known-set file at {}, starting empty", self.path.display());
                return Ok(KnownSet::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read known set: {}", self.path.display()))
            }
        };
        let urls: Vec<String> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse known set: {}", self.path.display()))?;
        Ok(urls.into_iter().collect())
    }

    /// Replace the file with a snapshot of `set` (creates parent dir if needed).
    ///
    /// Written to a temp file in the same directory and renamed into place,
    /// so readers never see a truncated file.
    pub fn save(&self, set: &KnownSet) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;

        let urls: Vec<&str> = set.iter().collect();
        let json = serde_json::to_string_pretty(&urls).context("serialize known set")?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.flush())
            .with_context(|| format!("write known set: {}", self.path.display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("replace known set: {}", self.path.display()))?;

        tracing::debug!(count = set.len(), "saved known set to {}", self.path.display());
        Ok(())
    }
}
