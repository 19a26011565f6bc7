//! CLI command handlers, one file per command.

mod check;
mod known;
mod run;

pub use check::run_check;
pub use known::run_known;
pub use run::run_once;
