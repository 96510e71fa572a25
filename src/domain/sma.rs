//! Simple moving average.
//!
//! SMA(n)[i] = (P[i-n+1] + ... + P[i]) / n, inclusive of the current price.
//! Warmup: the first (n-1) values are `None`.
//! Each window is summed on its own; no running sum.

pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    prices
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                None
            } else {
                let window = &prices[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}
