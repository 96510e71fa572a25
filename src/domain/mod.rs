//! Core domain types and pipeline stages.

pub mod price;
pub mod sma;
pub mod signal;
pub mod position;
pub mod trade;
pub mod backtest;
pub mod metrics;
pub mod strategy;
pub mod config_validation;
pub mod error;
