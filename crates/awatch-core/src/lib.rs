pub mod config;
pub mod logging;

pub mod extract;
pub mod http;
pub mod known_set;
pub mod notify;
pub mod reconcile;
