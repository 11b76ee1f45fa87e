//! Relay pipeline module.

mod handler;
mod stats;

pub use handler::RelayHandler;
pub use stats::RelayStats;
