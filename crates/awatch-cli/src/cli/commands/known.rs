//! `awatch known` – print the recorded known set.

use anyhow::Result;
use awatch_core::config::WatchConfig;
use awatch_core::known_set::KnownSetStore;

pub fn run_known(cfg: &WatchConfig) -> Result<()> {
    let store = KnownSetStore::new(&cfg.state_path);
    let set = store.load()?;
    if set.is_empty() {
        println!("No known URLs in {}.", store.path().display());
    } else {
        for url in set.iter() {
            println!("{}", url);
        }
        println!("{} known URL(s) in {}", set.len(), store.path().display());
    }
    Ok(())
}
