//! One fetch–diff–notify pass.
//!
//! Loads the known set, asks the link source for current links, and notifies
//! each unseen URL in the source's order. The known set is saved after every
//! delivered notification, so a webhook failure midway leaves exactly the
//! delivered URLs persisted and the next run does not repeat them.

use anyhow::{Context, Result};

use crate::extract::{ExtractError, ExtractOutcome, LinkSource};
use crate::known_set::KnownSetStore;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Report new URLs without notifying or touching the state file.
    pub dry_run: bool,
}

/// Outcome of a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// URLs first seen in this pass (notified unless `dry_run`).
    pub new_urls: Vec<String>,
    /// Size of the known set after the pass.
    pub known_total: usize,
    /// The listing page could not be fetched; nothing was compared.
    pub fetch_failed: bool,
}

pub struct Reconciler<'a, S, N> {
    store: &'a KnownSetStore,
    source: &'a S,
    notifier: &'a N,
}

impl<'a, S: LinkSource, N: Notifier> Reconciler<'a, S, N> {
    pub fn new(store: &'a KnownSetStore, source: &'a S, notifier: &'a N) -> Self {
        Self {
            store,
            source,
            notifier,
        }
    }

    pub fn run(&self, opts: RunOptions) -> Result<RunReport> {
        let mut known = self.store.load()?;

        let outcome = match self.source.current_links() {
            Ok(outcome) => outcome,
            Err(ExtractError::Structural { reason }) => {
                tracing::error!("listing page yielded no article links: {}", reason);
                if !opts.dry_run {
                    self.notifier
                        .notify_error(&reason)
                        .context("send extraction failure notice")?;
                }
                return Err(ExtractError::Structural { reason }.into());
            }
            Err(e) => return Err(e.into()),
        };
        let fetch_failed = matches!(outcome, ExtractOutcome::FetchFailed);
        let current = outcome.into_links();

        let new_urls = known.unseen(&current);
        tracing::info!(
            current = current.len(),
            known = known.len(),
            new = new_urls.len(),
            "compared listing with known set"
        );

        if opts.dry_run {
            return Ok(RunReport {
                known_total: known.len(),
                new_urls,
                fetch_failed,
            });
        }

        for url in &new_urls {
            tracing::info!(url = %url, "notifying new article");
            self.notifier
                .notify(url)
                .with_context(|| format!("notify new article {}", url))?;
            known.insert(url.as_str());
            self.store.save(&known)?;
        }

        // Still rewrite when nothing changed so the file exists and stays normalized.
        if new_urls.is_empty() {
            self.store.save(&known)?;
        }

        Ok(RunReport {
            known_total: known.len(),
            new_urls,
            fetch_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_set::KnownSet;
    use crate::notify::NotifyError;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct FixedSource(Result<ExtractOutcome, String>);

    impl LinkSource for FixedSource {
        fn current_links(&self) -> Result<ExtractOutcome, ExtractError> {
            self.0.clone().map_err(|reason| ExtractError::Structural { reason })
        }
    }

    fn links(urls: &[&str]) -> FixedSource {
        FixedSource(Ok(ExtractOutcome::Links(
            urls.iter().map(|s| s.to_string()).collect(),
        )))
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<String>>,
        errors: RefCell<Vec<String>>,
        fail_on_call: Option<usize>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, url: &str) -> Result<(), NotifyError> {
            if self.fail_on_call == Some(self.sent.borrow().len() + 1) {
                return Err(NotifyError::Unconfigured);
            }
            self.sent.borrow_mut().push(url.to_string());
            Ok(())
        }

        fn notify_error(&self, reason: &str) -> Result<(), NotifyError> {
            self.errors.borrow_mut().push(reason.to_string());
            Ok(())
        }
    }

    const A1: &str = "https://www.lifehacker.jp/article/1";
    const A2: &str = "https://www.lifehacker.jp/article/2";
    const A3: &str = "https://www.lifehacker.jp/article/3";

    fn store_with(dir: &std::path::Path, urls: &[&str]) -> KnownSetStore {
        let store = KnownSetStore::new(dir.join("known_urls.json"));
        if !urls.is_empty() {
            store.save(&urls.iter().copied().collect()).unwrap();
        }
        store
    }

    #[test]
    fn notifies_only_the_unseen_url() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[A1]);
        let source = links(&[A1, A2]);
        let notifier = RecordingNotifier::default();

        let report = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap();

        assert_eq!(report.new_urls, vec![A2.to_string()]);
        assert_eq!(report.known_total, 2);
        assert_eq!(*notifier.sent.borrow(), vec![A2.to_string()]);
        let stored: KnownSet = [A1, A2].into_iter().collect();
        assert_eq!(store.load().unwrap(), stored);
    }

    #[test]
    fn first_run_treats_everything_as_new() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[]);
        let source = links(&[A1, A2, A3]);
        let notifier = RecordingNotifier::default();

        let report = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap();

        assert_eq!(report.new_urls.len(), 3);
        assert_eq!(notifier.sent.borrow().len(), 3);
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[test]
    fn nothing_new_still_writes_state() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[]);
        let source = links(&[]);
        let notifier = RecordingNotifier::default();

        let report = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap();

        assert!(report.new_urls.is_empty());
        assert!(store.path().exists());
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn structural_failure_reports_and_leaves_state_untouched() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[A1]);
        let before = std::fs::read(store.path()).unwrap();
        let source = FixedSource(Err("no cards".to_string()));
        let notifier = RecordingNotifier::default();

        let err = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::Structural { .. })
        ));
        assert_eq!(*notifier.errors.borrow(), vec!["no cards".to_string()]);
        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn fetch_failure_is_zero_new_urls() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[A1]);
        let source = FixedSource(Ok(ExtractOutcome::FetchFailed));
        let notifier = RecordingNotifier::default();

        let report = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap();

        assert!(report.fetch_failed);
        assert!(report.new_urls.is_empty());
        assert_eq!(report.known_total, 1);
        assert!(notifier.errors.borrow().is_empty());
    }

    #[test]
    fn delivery_failure_keeps_already_notified_urls() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[]);
        let source = links(&[A1, A2, A3]);
        let notifier = RecordingNotifier {
            fail_on_call: Some(2),
            ..RecordingNotifier::default()
        };

        let err = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap_err();

        assert!(format!("{:#}", err).contains(A2));
        assert_eq!(*notifier.sent.borrow(), vec![A1.to_string()]);
        let stored: KnownSet = [A1].into_iter().collect();
        assert_eq!(store.load().unwrap(), stored);
    }

    #[test]
    fn dry_run_neither_notifies_nor_saves() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[]);
        let source = links(&[A1, A2]);
        let notifier = RecordingNotifier::default();

        let report = Reconciler::new(&store, &source, &notifier)
            .run(RunOptions { dry_run: true })
            .unwrap();

        assert_eq!(report.new_urls, vec![A1.to_string(), A2.to_string()]);
        assert!(notifier.sent.borrow().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn unsorted_source_keeps_source_order() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[A2]);
        let source = links(&[A3, A2, A1]);
        let notifier = RecordingNotifier::default();

        Reconciler::new(&store, &source, &notifier)
            .run(RunOptions::default())
            .unwrap();

        assert_eq!(*notifier.sent.borrow(), vec![A3.to_string(), A1.to_string()]);
        let raw: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw, vec![A1, A2, A3]);
    }
}
