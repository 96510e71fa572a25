//! Backtest pipeline: signals, positions, returns, metrics.
//!
//! prices -> SignalEngine -> track_positions -> simulate_returns -> Metrics.
//! Every stage is a pure function of the previous stage's output; output
//! side effects go through [`publish`] and a [`ReportPort`].

use chrono::NaiveDate;

use super::error::GoldenCrossError;
use super::metrics::{DEFAULT_RISK_FREE_RATE, Metrics, MetricsReport};
use super::position::{PositionRecord, track_positions};
use super::price::PriceSeries;
use super::signal::{SignalEngine, SignalRecord};
use super::strategy::StrategyConfig;
use super::trade::{Trade, extract_trades};
use crate::ports::report_port::ReportPort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Annual rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRecord {
    pub date: NaiveDate,
    pub index_return: f64,
    pub strategy_return: f64,
    pub buy_hold_return: f64,
    pub strategy_equity: f64,
    pub buy_hold_equity: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub signals: Vec<SignalRecord>,
    pub positions: Vec<PositionRecord>,
    pub returns: Vec<ReturnRecord>,
    pub trades: Vec<Trade>,
    pub metrics: MetricsReport,
}

impl BacktestResult {
    /// Last (strategy, buy-and-hold) equity values, if any returns exist.
    pub fn final_equity(&self) -> Option<(f64, f64)> {
        self.returns
            .last()
            .map(|r| (r.strategy_equity, r.buy_hold_equity))
    }

    pub fn strategy_returns(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.strategy_return).collect()
    }

    pub fn buy_hold_returns(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.buy_hold_return).collect()
    }
}

/// Daily returns and compounded equity for the strategy and the benchmark.
///
/// Today's strategy return is earned by yesterday's closing position. The
/// first record has no prior price and is dropped.
pub fn simulate_returns(positions: &[PositionRecord], initial_capital: f64) -> Vec<ReturnRecord> {
    let mut strategy_equity = initial_capital;
    let mut buy_hold_equity = initial_capital;

    positions
        .windows(2)
        .map(|w| {
            let (prev, today) = (&w[0], &w[1]);
            let index_return = today.price / prev.price - 1.0;
            let strategy_return = prev.position.exposure() * index_return;
            let buy_hold_return = index_return;

            strategy_equity *= 1.0 + strategy_return;
            buy_hold_equity *= 1.0 + buy_hold_return;

            ReturnRecord {
                date: today.date,
                index_return,
                strategy_return,
                buy_hold_return,
                strategy_equity,
                buy_hold_equity,
            }
        })
        .collect()
}

pub fn run_backtest(
    prices: &PriceSeries,
    strategy: &StrategyConfig,
    config: &BacktestConfig,
) -> BacktestResult {
    if strategy.long_window <= strategy.short_window {
        tracing::warn!(
            short_window = strategy.short_window,
            long_window = strategy.long_window,
            "long window does not exceed short window; crossovers lose golden-cross meaning"
        );
    }

    let signals = SignalEngine::new(prices.points(), strategy).generate_signals();
    let positions = track_positions(&signals, strategy.stop_loss_pct);
    let returns = simulate_returns(&positions, config.initial_capital);
    let trades = extract_trades(&positions);

    tracing::debug!(
        prices = prices.len(),
        signals = signals.len(),
        returns = returns.len(),
        trades = trades.len(),
        "backtest complete"
    );

    let mut result = BacktestResult {
        signals,
        positions,
        returns,
        trades,
        metrics: MetricsReport::default(),
    };
    result.metrics = MetricsReport {
        strategy: Metrics::compute(&result.strategy_returns(), config.risk_free_rate),
        buy_and_hold: Metrics::compute(&result.buy_hold_returns(), config.risk_free_rate),
    };
    result
}

/// Hand every record set to the output sink.
pub fn publish(result: &BacktestResult, sink: &dyn ReportPort) -> Result<(), GoldenCrossError> {
    sink.write_signals(&result.signals, &result.positions)?;
    sink.write_equity(&result.returns)?;
    sink.write_trades(&result.trades)?;
    sink.write_metrics(&result.metrics)?;
    Ok(())
}
