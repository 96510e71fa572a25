//! Strategy parameters.

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;
pub const DEFAULT_STOP_LOSS_PCT: f64 = 0.10;

/// Moving-average crossover parameters with a trailing stop.
///
/// `long_window` is expected to exceed `short_window` for golden-cross
/// semantics; this is a documented precondition, not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub short_window: usize,
    pub long_window: usize,
    /// Fraction below the high-water mark that forces an exit, e.g. 0.10.
    pub stop_loss_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
        }
    }
}

impl StrategyConfig {
    pub fn name(&self) -> String {
        format!(
            "SMA({}/{}) cross, {:.0}% trailing stop",
            self.short_window,
            self.long_window,
            self.stop_loss_pct * 100.0
        )
    }

    /// Number of leading observations dropped before both averages exist.
    pub fn warmup(&self) -> usize {
        self.short_window.max(self.long_window).saturating_sub(1)
    }
}
