//! Performance metrics over a daily return series.
//!
//! Percentages are reported as ×100 of the fractional value. A metric that
//! cannot be computed is `None`, never zero.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub total_return_pct: Option<f64>,
    pub annualized_return_pct: Option<f64>,
    pub annualized_volatility_pct: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
}

impl Metrics {
    pub const NAMES: [&'static str; 5] = [
        "Total Return (%)",
        "Annualized Return (%)",
        "Annualized Volatility (%)",
        "Sharpe Ratio",
        "Maximum Drawdown (%)",
    ];

    /// All metrics missing.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn compute(returns: &[f64], risk_free_rate: f64) -> Self {
        if returns.is_empty() {
            return Self::unavailable();
        }

        let n = returns.len() as f64;
        let total_return = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;
        let annualized_return = (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / n) - 1.0;

        let annualized_volatility =
            sample_stddev(returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt());

        let sharpe_ratio = annualized_volatility.map(|vol| {
            if vol == 0.0 {
                0.0
            } else {
                (annualized_return - risk_free_rate) / vol
            }
        });

        Metrics {
            total_return_pct: Some(total_return * 100.0),
            annualized_return_pct: Some(annualized_return * 100.0),
            annualized_volatility_pct: annualized_volatility.map(|v| v * 100.0),
            sharpe_ratio,
            max_drawdown_pct: max_drawdown(returns).map(|dd| dd * 100.0),
        }
    }

    /// Values in the order of [`Metrics::NAMES`].
    pub fn values(&self) -> [Option<f64>; 5] {
        [
            self.total_return_pct,
            self.annualized_return_pct,
            self.annualized_volatility_pct,
            self.sharpe_ratio,
            self.max_drawdown_pct,
        ]
    }
}

/// Strategy and benchmark metrics side by side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsReport {
    pub strategy: Metrics,
    pub buy_and_hold: Metrics,
}

impl MetricsReport {
    pub const COLUMNS: [&'static str; 2] = ["Strategy", "Buy and Hold"];

    /// One row per metric: (name, strategy value, buy-and-hold value).
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>, Option<f64>)> {
        Metrics::NAMES
            .iter()
            .zip(self.strategy.values())
            .zip(self.buy_and_hold.values())
            .map(|((&name, s), b)| (name, s, b))
            .collect()
    }
}

/// Sample standard deviation (n - 1 denominator); undefined below two observations.
fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Largest peak-to-trough decline of compounded wealth, as a fraction <= 0.
///
/// `None` once wealth is wiped out at the first observation: the running
/// peak is then zero and the decline from it is undefined.
fn max_drawdown(returns: &[f64]) -> Option<f64> {
    let mut wealth = 1.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for r in returns {
        wealth *= 1.0 + r;
        peak = peak.max(wealth);
        if peak <= 0.0 {
            return None;
        }
        max_dd = max_dd.min((wealth - peak) / peak);
    }

    Some(max_dd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn empty_series_is_unavailable() {
        let m = Metrics::compute(&[], 0.02);
        assert_eq!(m, Metrics::unavailable());
        assert!(m.values().iter().all(Option::is_none));
    }

    #[test]
    fn total_return_compounds() {
        let m = Metrics::compute(&[0.10, -0.05, 0.02], 0.02);
        let expected = (1.10 * 0.95 * 1.02 - 1.0) * 100.0;
        assert_relative_eq!(m.total_return_pct.unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn annualized_return_full_year() {
        let m = Metrics::compute(&[0.0; 252], 0.0);
        assert_abs_diff_eq!(m.annualized_return_pct.unwrap(), 0.0, epsilon = 1e-12);

        let returns = vec![0.001; 126];
        let m = Metrics::compute(&returns, 0.0);
        let total = 1.001_f64.powi(126);
        let expected = (total.powf(2.0) - 1.0) * 100.0;
        assert_relative_eq!(m.annualized_return_pct.unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn volatility_uses_sample_stddev() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        let m = Metrics::compute(&returns, 0.0);
        let mean = 0.02 / 4.0;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 3.0;
        let expected = var.sqrt() * 252f64.sqrt() * 100.0;
        assert_relative_eq!(m.annualized_volatility_pct.unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn single_observation_has_no_volatility() {
        let m = Metrics::compute(&[0.01], 0.02);
        assert!(m.total_return_pct.is_some());
        assert!(m.annualized_volatility_pct.is_none());
        assert!(m.sharpe_ratio.is_none());
        assert_eq!(m.max_drawdown_pct, Some(0.0));
    }

    #[test]
    fn sharpe_zero_when_volatility_zero() {
        let m = Metrics::compute(&[0.0078125; 8], 0.02);
        assert_eq!(m.annualized_volatility_pct, Some(0.0));
        assert_eq!(m.sharpe_ratio, Some(0.0));
    }

    #[test]
    fn sharpe_is_excess_over_volatility() {
        let returns = [0.01, -0.005, 0.007, 0.002, -0.001];
        let m = Metrics::compute(&returns, 0.02);
        let ann_ret = m.annualized_return_pct.unwrap() / 100.0;
        let ann_vol = m.annualized_volatility_pct.unwrap() / 100.0;
        assert_relative_eq!(m.sharpe_ratio.unwrap(), (ann_ret - 0.02) / ann_vol, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_zero_for_rising_wealth() {
        let m = Metrics::compute(&[0.01, 0.02, 0.0, 0.03], 0.0);
        assert_eq!(m.max_drawdown_pct, Some(0.0));
    }

    #[test]
    fn drawdown_half_from_peak() {
        let m = Metrics::compute(&[0.10, 0.20, -0.50, 0.30], 0.0);
        assert_relative_eq!(m.max_drawdown_pct.unwrap(), -50.0, epsilon = 1e-9);
    }

    #[test]
    fn drawdown_is_deepest_trough() {
        // wealth 1.1, 0.99, 1.188, 0.8316 -> peak 1.188, trough 0.8316
        let dd = max_drawdown(&[0.10, -0.10, 0.20, -0.30]).unwrap();
        assert_relative_eq!(dd, -0.30, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_missing_when_wiped_out_on_first_day() {
        let m = Metrics::compute(&[-1.0, 0.0, 0.0], 0.02);
        assert_eq!(m.total_return_pct, Some(-100.0));
        assert_eq!(m.max_drawdown_pct, None);
    }

    #[test]
    fn drawdown_counts_later_wipe_out() {
        let m = Metrics::compute(&[0.10, -1.0, 0.0], 0.02);
        assert_relative_eq!(m.max_drawdown_pct.unwrap(), -100.0, epsilon = 1e-12);
    }

    #[test]
    fn report_rows_pair_columns() {
        let report = MetricsReport {
            strategy: Metrics::compute(&[0.01, 0.02], 0.02),
            buy_and_hold: Metrics::unavailable(),
        };
        let rows = report.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].0, "Total Return (%)");
        assert!(rows[0].1.is_some());
        assert!(rows[0].2.is_none());
        assert_eq!(rows[4].0, "Maximum Drawdown (%)");
    }
}
