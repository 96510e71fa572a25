//! CSV report adapter implementing ReportPort.
//!
//! Writes one file per record set into the output directory:
//! `signals.csv`, `equity_curve.csv`, `trades.csv` and `metrics_summary.csv`.
//! Missing values are written as empty cells.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::backtest::ReturnRecord;
use crate::domain::error::GoldenCrossError;
use crate::domain::metrics::MetricsReport;
use crate::domain::position::PositionRecord;
use crate::domain::signal::SignalRecord;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

pub const SIGNALS_FILE: &str = "signals.csv";
pub const EQUITY_FILE: &str = "equity_curve.csv";
pub const TRADES_FILE: &str = "trades.csv";
pub const METRICS_FILE: &str = "metrics_summary.csv";

pub struct CsvReportAdapter {
    output_dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn writer(&self, file: &str) -> Result<csv::Writer<fs::File>, GoldenCrossError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file);
        csv::Writer::from_path(&path).map_err(|e| report_error(&path, e))
    }

    fn finish(&self, file: &str, mut wtr: csv::Writer<fs::File>) -> Result<(), GoldenCrossError> {
        wtr.flush()?;
        tracing::debug!(path = %self.output_dir.join(file).display(), "report written");
        Ok(())
    }
}

fn report_error(path: &Path, err: csv::Error) -> GoldenCrossError {
    GoldenCrossError::Report {
        reason: format!("failed to write {}: {}", path.display(), err),
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write_signals(
        &self,
        signals: &[SignalRecord],
        positions: &[PositionRecord],
    ) -> Result<(), GoldenCrossError> {
        let path = self.output_dir.join(SIGNALS_FILE);
        let mut wtr = self.writer(SIGNALS_FILE)?;
        wtr.write_record([
            "date",
            "price",
            "sma_short",
            "sma_long",
            "raw_signal",
            "effective_signal",
            "position",
            "high_since_entry",
            "signal",
            "exit_reason",
        ])
        .map_err(|e| report_error(&path, e))?;

        for (s, p) in signals.iter().zip(positions) {
            wtr.write_record([
                s.date.to_string(),
                s.price.to_string(),
                s.sma_short.to_string(),
                s.sma_long.to_string(),
                s.raw_signal.to_string(),
                s.effective_signal.to_string(),
                p.position.exposure().to_string(),
                opt(p.high_since_entry),
                p.signal.to_string(),
                p.exit_reason.to_string(),
            ])
            .map_err(|e| report_error(&path, e))?;
        }

        self.finish(SIGNALS_FILE, wtr)
    }

    fn write_equity(&self, returns: &[ReturnRecord]) -> Result<(), GoldenCrossError> {
        let path = self.output_dir.join(EQUITY_FILE);
        let mut wtr = self.writer(EQUITY_FILE)?;
        wtr.write_record([
            "date",
            "index_return",
            "strategy_return",
            "buy_hold_return",
            "strategy_equity",
            "buy_hold_equity",
        ])
        .map_err(|e| report_error(&path, e))?;

        for r in returns {
            wtr.write_record([
                r.date.to_string(),
                r.index_return.to_string(),
                r.strategy_return.to_string(),
                r.buy_hold_return.to_string(),
                r.strategy_equity.to_string(),
                r.buy_hold_equity.to_string(),
            ])
            .map_err(|e| report_error(&path, e))?;
        }

        self.finish(EQUITY_FILE, wtr)
    }

    fn write_metrics(&self, metrics: &MetricsReport) -> Result<(), GoldenCrossError> {
        let path = self.output_dir.join(METRICS_FILE);
        let mut wtr = self.writer(METRICS_FILE)?;
        let [strategy, buy_hold] = MetricsReport::COLUMNS;
        wtr.write_record(["", strategy, buy_hold])
            .map_err(|e| report_error(&path, e))?;

        for (name, s, b) in metrics.rows() {
            wtr.write_record([name.to_string(), opt(s), opt(b)])
                .map_err(|e| report_error(&path, e))?;
        }

        self.finish(METRICS_FILE, wtr)
    }

    fn write_trades(&self, trades: &[Trade]) -> Result<(), GoldenCrossError> {
        let path = self.output_dir.join(TRADES_FILE);
        let mut wtr = self.writer(TRADES_FILE)?;
        wtr.write_record([
            "entry_date",
            "entry_price",
            "exit_date",
            "exit_price",
            "exit_reason",
            "return_pct",
            "holding_days",
        ])
        .map_err(|e| report_error(&path, e))?;

        for t in trades {
            wtr.write_record([
                t.entry_date.to_string(),
                t.entry_price.to_string(),
                t.exit_date.map(|d| d.to_string()).unwrap_or_default(),
                opt(t.exit_price),
                t.exit_reason.to_string(),
                opt(t.return_pct()),
                t.holding_days().map(|d| d.to_string()).unwrap_or_default(),
            ])
            .map_err(|e| report_error(&path, e))?;
        }

        self.finish(TRADES_FILE, wtr)
    }
}
