#![allow(dead_code)]

use chrono::NaiveDate;
use goldencross::domain::backtest::ReturnRecord;
use goldencross::domain::error::GoldenCrossError;
use goldencross::domain::metrics::MetricsReport;
use goldencross::domain::position::PositionRecord;
pub use goldencross::domain::price::{PricePoint, PriceSeries};
use goldencross::domain::signal::SignalRecord;
use goldencross::domain::strategy::StrategyConfig;
use goldencross::domain::trade::Trade;
use goldencross::ports::data_port::DataPort;
use goldencross::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, GoldenCrossError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(GoldenCrossError::DataRetrieval {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| start_date.is_none_or(|s| p.date >= s))
            .filter(|p| end_date.is_none_or(|e| p.date <= e))
            .collect();
        PriceSeries::new(points)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, GoldenCrossError> {
        match self.data.get(ticker) {
            Some(points) if !points.is_empty() => Ok(Some((
                points[0].date,
                points[points.len() - 1].date,
                points.len(),
            ))),
            _ => Ok(None),
        }
    }
}

/// Records everything published to it.
#[derive(Default)]
pub struct MemorySink {
    pub signals: RefCell<Vec<SignalRecord>>,
    pub positions: RefCell<Vec<PositionRecord>>,
    pub returns: RefCell<Vec<ReturnRecord>>,
    pub trades: RefCell<Vec<Trade>>,
    pub metrics: RefCell<Option<MetricsReport>>,
}

impl ReportPort for MemorySink {
    fn write_signals(
        &self,
        signals: &[SignalRecord],
        positions: &[PositionRecord],
    ) -> Result<(), GoldenCrossError> {
        *self.signals.borrow_mut() = signals.to_vec();
        *self.positions.borrow_mut() = positions.to_vec();
        Ok(())
    }

    fn write_equity(&self, returns: &[ReturnRecord]) -> Result<(), GoldenCrossError> {
        *self.returns.borrow_mut() = returns.to_vec();
        Ok(())
    }

    fn write_metrics(&self, metrics: &MetricsReport) -> Result<(), GoldenCrossError> {
        *self.metrics.borrow_mut() = Some(*metrics);
        Ok(())
    }

    fn write_trades(&self, trades: &[Trade]) -> Result<(), GoldenCrossError> {
        *self.trades.borrow_mut() = trades.to_vec();
        Ok(())
    }
}

/// A sink that rejects every write.
pub struct FailingSink;

impl ReportPort for FailingSink {
    fn write_signals(&self, _: &[SignalRecord], _: &[PositionRecord]) -> Result<(), GoldenCrossError> {
        Err(GoldenCrossError::Report {
            reason: "disk full".into(),
        })
    }

    fn write_equity(&self, _: &[ReturnRecord]) -> Result<(), GoldenCrossError> {
        Ok(())
    }

    fn write_metrics(&self, _: &MetricsReport) -> Result<(), GoldenCrossError> {
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn make_points(prices: &[f64]) -> Vec<PricePoint> {
    let start = date(2024, 1, 1);
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PricePoint::new(start + chrono::Duration::days(i as i64), price))
        .collect()
}

pub fn make_series(prices: &[f64]) -> PriceSeries {
    PriceSeries::new(make_points(prices)).unwrap()
}

pub fn strategy(short_window: usize, long_window: usize, stop_loss_pct: f64) -> StrategyConfig {
    StrategyConfig {
        short_window,
        long_window,
        stop_loss_pct,
    }
}

/// Crosses up on day 5 (index 4), rises to 110, then trips a 10% stop at 97.
pub const ENTRY_AND_STOP: [f64; 9] = [100.0, 98.0, 96.0, 99.0, 103.0, 108.0, 110.0, 97.0, 95.0];

/// Crossover sell with no prior entry.
pub const SELL_ONLY: [f64; 7] = [100.0, 102.0, 101.0, 105.0, 95.0, 90.0, 85.0];
