//! Output sink port trait.

use crate::domain::backtest::ReturnRecord;
use crate::domain::error::GoldenCrossError;
use crate::domain::metrics::MetricsReport;
use crate::domain::position::PositionRecord;
use crate::domain::signal::SignalRecord;
use crate::domain::trade::Trade;

/// Port for persisting or rendering backtest record sets.
pub trait ReportPort {
    /// Signal and position records share dates index for index.
    fn write_signals(
        &self,
        signals: &[SignalRecord],
        positions: &[PositionRecord],
    ) -> Result<(), GoldenCrossError>;

    fn write_equity(&self, returns: &[ReturnRecord]) -> Result<(), GoldenCrossError>;

    fn write_metrics(&self, metrics: &MetricsReport) -> Result<(), GoldenCrossError>;

    /// Default implementation: sinks without a trade log ignore trades.
    fn write_trades(&self, _trades: &[Trade]) -> Result<(), GoldenCrossError> {
        Ok(())
    }
}
