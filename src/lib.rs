//! Moving-average crossover backtester with a trailing stop-loss.
//!
//! Hexagonal architecture: pure pipeline stages in [`domain`], port traits in
//! [`ports`], concrete I/O in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
