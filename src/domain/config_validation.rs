//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::GoldenCrossError;
use crate::domain::strategy::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW, DEFAULT_STOP_LOSS_PCT};
use crate::domain::{backtest::DEFAULT_INITIAL_CAPITAL, metrics::DEFAULT_RISK_FREE_RATE};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), GoldenCrossError> {
    validate_data_config(config)?;
    validate_strategy_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), GoldenCrossError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid("data", "start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), GoldenCrossError> {
    let short = parse_number(config, "strategy", "short_window", DEFAULT_SHORT_WINDOW)?;
    if short == 0 {
        return Err(invalid("strategy", "short_window", "short_window must be positive"));
    }
    let long = parse_number(config, "strategy", "long_window", DEFAULT_LONG_WINDOW)?;
    if long == 0 {
        return Err(invalid("strategy", "long_window", "long_window must be positive"));
    }

    let stop = parse_number(config, "strategy", "stop_loss_pct", DEFAULT_STOP_LOSS_PCT)?;
    if !(0.0..1.0).contains(&stop) {
        return Err(invalid(
            "strategy",
            "stop_loss_pct",
            "stop_loss_pct must be between 0 and 1",
        ));
    }
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), GoldenCrossError> {
    let capital = parse_number(config, "backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)?;
    if !(capital > 0.0 && capital.is_finite()) {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }

    let rate = parse_number(config, "backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE)?;
    if !(0.0..1.0).contains(&rate) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

/// Raw value of `key`, parsed; `default` when the key is absent.
///
/// The typed `ConfigPort` getters fall back to the default on a parse
/// failure, so validation reads the string itself.
fn parse_number<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, GoldenCrossError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            invalid(section, key, &format!("{} is not a valid number: {:?}", key, raw))
        }),
    }
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, GoldenCrossError> {
    match config.get_string("data", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "data",
                    key,
                    &format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> GoldenCrossError {
    GoldenCrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
