//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, BacktestResult, DEFAULT_INITIAL_CAPITAL,
};
use crate::domain::config_validation::{parse_optional_date, validate_config};
use crate::domain::error::GoldenCrossError;
use crate::domain::metrics::{DEFAULT_RISK_FREE_RATE, MetricsReport};
use crate::domain::position::ExitReason;
use crate::domain::strategy::{
    DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW, DEFAULT_STOP_LOSS_PCT, StrategyConfig,
};
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TICKER: &str = "^HSI";
pub const DEFAULT_OUTPUT_DIR: &str = "results";

#[derive(Parser, Debug)]
#[command(
    name = "goldencross",
    about = "Moving-average crossover backtester with a trailing stop-loss"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest against buy-and-hold
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the cached price range for a ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

/// Where prices come from and which slice of them to use.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub directory: PathBuf,
    pub ticker: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    match cli.command {
        Command::Backtest {
            config,
            ticker,
            data_dir,
            output,
            dry_run,
        } => {
            if dry_run {
                run_validate(&config)
            } else {
                run_backtest(&config, ticker.as_deref(), data_dir, output)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            config,
            ticker,
            data_dir,
        } => run_info(&config, ticker.as_deref(), data_dir),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GoldenCrossError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_and_validate(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    validate_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    Ok(adapter)
}

fn run_backtest(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
    output_override: Option<PathBuf>,
) -> ExitCode {
    let adapter = match load_and_validate(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let settings = match build_data_settings(&adapter, ticker_override, data_dir_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let strategy = build_strategy_config(&adapter);
    let bt_config = build_backtest_config(&adapter);
    let output_dir = output_override.unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("report", "output_dir")
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        )
    });

    let data_port = CsvAdapter::new(settings.directory.clone());
    let sink = CsvReportAdapter::new(output_dir);

    match run_backtest_pipeline(&data_port, &sink, &settings, &strategy, &bt_config) {
        Ok(result) => {
            print_summary(&result, &bt_config);
            eprintln!("\nReports written to: {}", sink.output_dir().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn build_data_settings(
    adapter: &dyn ConfigPort,
    ticker_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> Result<DataSettings, GoldenCrossError> {
    let ticker = ticker_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("data", "ticker"))
        .unwrap_or_else(|| DEFAULT_TICKER.to_string());
    let directory = data_dir_override.unwrap_or_else(|| {
        PathBuf::from(
            adapter
                .get_string("data", "directory")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        )
    });

    Ok(DataSettings {
        directory,
        ticker,
        start_date: parse_optional_date(adapter, "start_date")?,
        end_date: parse_optional_date(adapter, "end_date")?,
    })
}

pub fn build_strategy_config(adapter: &dyn ConfigPort) -> StrategyConfig {
    StrategyConfig {
        short_window: adapter.get_usize("strategy", "short_window", DEFAULT_SHORT_WINDOW),
        long_window: adapter.get_usize("strategy", "long_window", DEFAULT_LONG_WINDOW),
        stop_loss_pct: adapter.get_double("strategy", "stop_loss_pct", DEFAULT_STOP_LOSS_PCT),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
    }
}

/// Fetch prices, run every stage, and publish the records through `sink`.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    sink: &dyn ReportPort,
    settings: &DataSettings,
    strategy: &StrategyConfig,
    bt_config: &BacktestConfig,
) -> Result<BacktestResult, GoldenCrossError> {
    let prices = data_port.fetch_prices(&settings.ticker, settings.start_date, settings.end_date)?;
    eprintln!(
        "Running backtest: {} {} prices, {} to {}",
        settings.ticker,
        prices.len(),
        prices.first_date(),
        prices.last_date(),
    );
    eprintln!("  Strategy: {}", strategy.name());

    let result = backtest_engine::run_backtest(&prices, strategy, bt_config);
    if result.signals.is_empty() {
        eprintln!(
            "warning: {} prices is not enough history, need more than {}",
            prices.len(),
            strategy.warmup()
        );
    }

    backtest_engine::publish(&result, sink)?;
    Ok(result)
}

pub fn format_metrics_table(report: &MetricsReport) -> String {
    let [strategy, buy_hold] = MetricsReport::COLUMNS;
    let mut out = format!("{:<28}{:>14}{:>14}\n", "", strategy, buy_hold);
    for (name, s, b) in report.rows() {
        out.push_str(&format!("{:<28}{:>14}{:>14}\n", name, format_value(s), format_value(b)));
    }
    out
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

fn print_summary(result: &BacktestResult, bt_config: &BacktestConfig) {
    let closed = result.trades.iter().filter(|t| !t.is_open()).count();
    let stop_losses = result
        .trades
        .iter()
        .filter(|t| t.exit_reason == ExitReason::StopLoss)
        .count();

    eprintln!("\n=== Results ===");
    eprintln!("Initial Capital:  ${:.2}", bt_config.initial_capital);
    if let Some((strategy_equity, buy_hold_equity)) = result.final_equity() {
        eprintln!("Strategy Equity:  ${:.2}", strategy_equity);
        eprintln!("Buy and Hold:     ${:.2}", buy_hold_equity);
    }
    eprintln!(
        "Trades:           {} ({} closed, {} stop-loss exits)",
        result.trades.len(),
        closed,
        stop_losses
    );

    println!("Metrics Summary:");
    print!("{}", format_metrics_table(&result.metrics));
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_and_validate(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let settings = match build_data_settings(&adapter, None, None) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let strategy = build_strategy_config(&adapter);
    let bt_config = build_backtest_config(&adapter);

    eprintln!("\nData:");
    eprintln!("  ticker:          {}", settings.ticker);
    eprintln!("  directory:       {}", settings.directory.display());
    if let Some(start) = settings.start_date {
        eprintln!("  start_date:      {}", start);
    }
    if let Some(end) = settings.end_date {
        eprintln!("  end_date:        {}", end);
    }
    eprintln!("\nStrategy:");
    eprintln!("  short_window:    {}", strategy.short_window);
    eprintln!("  long_window:     {}", strategy.long_window);
    eprintln!("  stop_loss_pct:   {}", strategy.stop_loss_pct);
    if strategy.long_window <= strategy.short_window {
        eprintln!("  warning: long_window should exceed short_window");
    }
    eprintln!("\nBacktest:");
    eprintln!("  initial_capital: {}", bt_config.initial_capital);
    eprintln!("  risk_free_rate:  {}", bt_config.risk_free_rate);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let settings = match build_data_settings(&config, ticker_override, data_dir_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(settings.directory.clone());
    match adapter.get_data_range(&settings.ticker) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} prices, {} to {}", settings.ticker, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", settings.ticker);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error querying {}: {}", settings.ticker, e);
            (&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::Metrics;

    #[test]
    fn cli_parses_backtest() {
        let cli = Cli::try_parse_from([
            "goldencross",
            "-v",
            "backtest",
            "--config",
            "gc.ini",
            "--ticker",
            "SPY",
            "--output",
            "out",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Backtest {
                config,
                ticker,
                output,
                dry_run,
                ..
            } => {
                assert_eq!(config, PathBuf::from("gc.ini"));
                assert_eq!(ticker.as_deref(), Some("SPY"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_requires_config() {
        assert!(Cli::try_parse_from(["goldencross", "validate"]).is_err());
    }

    #[test]
    fn metrics_table_marks_missing() {
        let report = MetricsReport {
            strategy: Metrics {
                sharpe_ratio: Some(1.234),
                ..Metrics::unavailable()
            },
            buy_and_hold: Metrics::unavailable(),
        };
        let table = format_metrics_table(&report);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Strategy"));
        assert!(lines[0].contains("Buy and Hold"));
        assert!(lines[4].starts_with("Sharpe Ratio"));
        assert!(lines[4].contains("1.23"));
        assert!(lines[1].ends_with("n/a"));
    }
}
