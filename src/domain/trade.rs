//! Round-trip trades derived from position records.

use chrono::NaiveDate;

use super::position::{ExitReason, Position, PositionRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    /// `None` while the position is still open at the end of the series.
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.exit_date.is_none()
    }

    /// Entry-to-exit price change, closed trades only.
    pub fn return_pct(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| (exit / self.entry_price - 1.0) * 100.0)
    }

    pub fn holding_days(&self) -> Option<i64> {
        self.exit_date.map(|exit| (exit - self.entry_date).num_days())
    }
}

/// Pair each flat-to-long transition with the next long-to-flat transition.
///
/// A buy while already long refreshes the stop but does not open a new trade.
pub fn extract_trades(positions: &[PositionRecord]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<Trade> = None;
    let mut prev = Position::Flat;

    for rec in positions {
        match (prev, rec.position) {
            (Position::Flat, Position::Long) => {
                open = Some(Trade {
                    entry_date: rec.date,
                    entry_price: rec.price,
                    exit_date: None,
                    exit_price: None,
                    exit_reason: ExitReason::None,
                });
            }
            (Position::Long, Position::Flat) => {
                if let Some(mut trade) = open.take() {
                    trade.exit_date = Some(rec.date);
                    trade.exit_price = Some(rec.price);
                    trade.exit_reason = rec.exit_reason;
                    trades.push(trade);
                }
            }
            _ => {}
        }
        prev = rec.position;
    }

    trades.extend(open);
    trades
}
