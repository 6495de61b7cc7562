//! # ipbot-runtime
//!
//! Wires the client, pipeline, and handlers together and drives the
//! long-poll loop.

mod config;
mod poller;
mod runner;

pub use config::BotConfig;
pub use poller::{Poller, PollerConfig};
pub use runner::run_bot;
