//! CLI for awatch.

mod commands;

use anyhow::Result;
use awatch_core::config::{self, WatchConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_check, run_known, run_once};

/// Top-level CLI for awatch.
#[derive(Debug, Parser)]
#[command(name = "awatch")]
#[command(about = "awatch: notify a webhook about newly published articles", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/awatch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the listing once, notify new articles, and record them.
    Run {
        /// Print new articles without notifying or saving state.
        #[arg(long)]
        dry_run: bool,
        /// Known-set JSON file (overrides state_path from config).
        #[arg(long, value_name = "PATH")]
        state: Option<PathBuf>,
    },

    /// Fetch the listing and print the article links found (no notification, no state change).
    Check,

    /// Print the recorded known set.
    Known {
        /// Known-set JSON file (overrides state_path from config).
        #[arg(long, value_name = "PATH")]
        state: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<WatchConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { dry_run, state } => {
                if let Some(state) = state {
                    cfg.state_path = state;
                }
                run_once(&cfg, dry_run)?;
            }
            CliCommand::Check => run_check(&cfg)?,
            CliCommand::Known { state } => {
                if let Some(state) = state {
                    cfg.state_path = state;
                }
                run_known(&cfg)?;
            }
        }

        Ok(())
    }
}
