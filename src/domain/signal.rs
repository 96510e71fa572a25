//! Moving-average crossover signals.
//!
//! Signals are computed from each day's closing averages and then lagged one
//! day: a crossover seen at the close of day T becomes actionable on T+1.

use chrono::NaiveDate;
use std::fmt;

use super::price::PricePoint;
use super::sma::calculate_sma;
use super::strategy::StrategyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Sell,
    #[default]
    Hold,
    Buy,
}

impl Signal {
    /// Numeric form used in tabular output: -1, 0 or +1.
    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A date on which both averages are defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub sma_short: f64,
    pub sma_long: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    /// Crossover observed at this date's close.
    pub raw_signal: Signal,
    /// Previous date's `raw_signal`; the only signal a position may act on.
    pub effective_signal: Signal,
}

pub struct SignalEngine<'a> {
    prices: &'a [PricePoint],
    short_window: usize,
    long_window: usize,
}

impl<'a> SignalEngine<'a> {
    pub fn new(prices: &'a [PricePoint], strategy: &StrategyConfig) -> Self {
        Self {
            prices,
            short_window: strategy.short_window,
            long_window: strategy.long_window,
        }
    }

    /// Both averages for every date that has them; warmup dates are dropped.
    pub fn compute_smas(&self) -> Vec<SmaPoint> {
        let closes: Vec<f64> = self.prices.iter().map(|p| p.price).collect();
        let short = calculate_sma(&closes, self.short_window);
        let long = calculate_sma(&closes, self.long_window);

        self.prices
            .iter()
            .zip(short.into_iter().zip(long))
            .filter_map(|(point, averages)| match averages {
                (Some(sma_short), Some(sma_long)) => Some(SmaPoint {
                    date: point.date,
                    price: point.price,
                    sma_short,
                    sma_long,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn generate_signals(&self) -> Vec<SignalRecord> {
        let smas = self.compute_smas();
        let mut records = Vec::with_capacity(smas.len());
        let mut prev_raw = Signal::Hold;

        for (i, today) in smas.iter().enumerate() {
            let raw_signal = if i == 0 {
                Signal::Hold
            } else {
                crossover(&smas[i - 1], today)
            };

            records.push(SignalRecord {
                date: today.date,
                price: today.price,
                sma_short: today.sma_short,
                sma_long: today.sma_long,
                raw_signal,
                effective_signal: prev_raw,
            });
            prev_raw = raw_signal;
        }

        tracing::debug!(
            dates = records.len(),
            buys = records.iter().filter(|r| r.raw_signal == Signal::Buy).count(),
            sells = records.iter().filter(|r| r.raw_signal == Signal::Sell).count(),
            "signals generated"
        );

        records
    }
}

fn crossover(yesterday: &SmaPoint, today: &SmaPoint) -> Signal {
    if today.sma_short > today.sma_long && yesterday.sma_short <= yesterday.sma_long {
        Signal::Buy
    } else if today.sma_short < today.sma_long && yesterday.sma_short >= yesterday.sma_long {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
