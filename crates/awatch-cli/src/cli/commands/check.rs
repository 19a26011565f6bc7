//! `awatch check` – show what the extractor currently sees.

use anyhow::Result;
use awatch_core::config::WatchConfig;
use awatch_core::extract::{ExtractOutcome, LinkSource, PageLinkSource};

pub fn run_check(cfg: &WatchConfig) -> Result<()> {
    let source = PageLinkSource::from_config(cfg);
    match source.current_links()? {
        ExtractOutcome::Links(links) => {
            println!("{} article link(s) on {}", links.len(), source.rules().target_url);
            for url in links {
                println!("  {}", url);
            }
        }
        ExtractOutcome::FetchFailed => {
            anyhow::bail!("could not fetch {}", source.rules().target_url);
        }
    }
    Ok(())
}
