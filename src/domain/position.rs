//! Position tracking with a trailing stop-loss.
//!
//! The tracker is a fold over the date-ordered signal records. Each day
//! applies exactly one transition to the carried [`PositionState`]:
//!
//! 1. effective signal `Buy`: go long, high-water mark resets to today's price
//! 2. effective signal `Sell`: go flat, high-water mark cleared
//! 3. while long: raise the high-water mark to today's price if higher; if the
//!    price closes below `high * (1 - stop_loss_pct)` go flat and record the
//!    day's signal as `Sell`
//!
//! Open positions are not closed at the end of the series.

use chrono::NaiveDate;
use std::fmt;

use super::signal::{Signal, SignalRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    /// 0 when flat, 1 when long.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    pub fn is_long(self) -> bool {
        self == Position::Long
    }
}

/// Why a long position was closed on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExitReason {
    #[default]
    None,
    Crossover,
    StopLoss,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::None => write!(f, "none"),
            ExitReason::Crossover => write!(f, "crossover"),
            ExitReason::StopLoss => write!(f, "stop_loss"),
        }
    }
}

/// State carried from one day to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionState {
    pub position: Position,
    /// Defined only while long.
    pub high_since_entry: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub position: Position,
    pub high_since_entry: Option<f64>,
    /// The effective signal, overwritten to `Sell` on a stop-loss exit.
    pub signal: Signal,
    pub exit_reason: ExitReason,
}

/// Apply one day's transition.
pub fn step(
    state: PositionState,
    today: &SignalRecord,
    stop_loss_pct: f64,
) -> (PositionState, PositionRecord) {
    let price = today.price;
    let was_long = state.position.is_long();
    let mut signal = today.effective_signal;
    let mut exit_reason = ExitReason::None;

    let mut next = match today.effective_signal {
        Signal::Buy => PositionState {
            position: Position::Long,
            high_since_entry: Some(price),
        },
        Signal::Sell => {
            if was_long {
                exit_reason = ExitReason::Crossover;
            }
            PositionState::default()
        }
        Signal::Hold => state,
    };

    if next.position.is_long() {
        let high = next.high_since_entry.map_or(price, |h| h.max(price));
        if price < high * (1.0 - stop_loss_pct) {
            tracing::debug!(date = %today.date, price, high, "stop-loss exit");
            next = PositionState::default();
            signal = Signal::Sell;
            exit_reason = ExitReason::StopLoss;
        } else {
            next.high_since_entry = Some(high);
        }
    }

    let record = PositionRecord {
        date: today.date,
        price,
        position: next.position,
        high_since_entry: next.high_since_entry,
        signal,
        exit_reason,
    };
    (next, record)
}

/// Run the state machine over the whole signal sequence, starting flat.
pub fn track_positions(signals: &[SignalRecord], stop_loss_pct: f64) -> Vec<PositionRecord> {
    signals
        .iter()
        .scan(PositionState::default(), |state, today| {
            let (next, record) = step(*state, today, stop_loss_pct);
            *state = next;
            Some(record)
        })
        .collect()
}
