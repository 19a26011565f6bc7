//! `awatch run` – one fetch, diff, and notify pass.

use anyhow::Result;
use awatch_core::config::WatchConfig;
use awatch_core::extract::PageLinkSource;
use awatch_core::known_set::KnownSetStore;
use awatch_core::notify::WebhookNotifier;
use awatch_core::reconcile::{Reconciler, RunOptions};

pub fn run_once(cfg: &WatchConfig, dry_run: bool) -> Result<()> {
    let store = KnownSetStore::new(&cfg.state_path);
    let source = PageLinkSource::from_config(cfg);
    let notifier = WebhookNotifier::new(cfg.resolve_webhook_url(), cfg.notify_timeout());
    if !notifier.is_configured() {
        tracing::warn!("no webhook configured; the run fails if anything needs to be sent");
    }

    let report = Reconciler::new(&store, &source, &notifier).run(RunOptions { dry_run })?;

    if report.fetch_failed {
        println!("Listing page could not be fetched; nothing compared.");
    }
    println!("Found {} new URLs", report.new_urls.len());
    for url in &report.new_urls {
        if dry_run {
            println!("  (dry run) {}", url);
        } else {
            println!("  notified {}", url);
        }
    }
    tracing::info!(
        new = report.new_urls.len(),
        known = report.known_total,
        dry_run,
        "run finished"
    );
    println!("Done.");
    Ok(())
}
